//! Keyword tables for free-text analysis, evaluated top to bottom

use autodesign_common::LocatorKind;

/// Keywords are matched as lower-case substrings of the whole text
pub fn matches_any(lower_text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| lower_text.contains(keyword))
}

pub struct LocatorRule {
    pub keywords: &'static [&'static str],
    pub name: &'static str,
    pub selector: &'static str,
    pub kind: LocatorKind,
}

pub const LOCATOR_RULES: &[LocatorRule] = &[
    LocatorRule {
        keywords: &["username", "user name", "login", "log in", "log into", "sign in", "email"],
        name: "usernameInput",
        selector: "getByLabel('Username')",
        kind: LocatorKind::Input,
    },
    LocatorRule {
        keywords: &["password", "pwd", "login", "log in", "log into", "sign in"],
        name: "passwordInput",
        selector: "getByLabel('Password')",
        kind: LocatorKind::Input,
    },
    LocatorRule {
        keywords: &["login", "log in", "log into", "sign in", "submit"],
        name: "loginButton",
        selector: "getByRole('button', { name: /login|sign in/i })",
        kind: LocatorKind::Button,
    },
    LocatorRule {
        keywords: &["search", "find"],
        name: "searchInput",
        selector: "getByPlaceholder('Search')",
        kind: LocatorKind::Input,
    },
    LocatorRule {
        keywords: &["menu", "navigation"],
        name: "mainNavigation",
        selector: "getByRole('navigation')",
        kind: LocatorKind::Navigation,
    },
    LocatorRule {
        keywords: &["product", "item", "list"],
        name: "productList",
        selector: "getByRole('grid', { name: 'Products' })",
        kind: LocatorKind::List,
    },
    LocatorRule {
        keywords: &["add", "create", "new"],
        name: "addButton",
        selector: "getByRole('button', { name: /add|create|new/i })",
        kind: LocatorKind::Button,
    },
    LocatorRule {
        keywords: &["save", "update"],
        name: "saveButton",
        selector: "getByRole('button', { name: /save|update/i })",
        kind: LocatorKind::Button,
    },
    LocatorRule {
        keywords: &["cancel", "close"],
        name: "cancelButton",
        selector: "getByRole('button', { name: /cancel|close/i })",
        kind: LocatorKind::Button,
    },
];

pub struct ContextRule {
    pub keywords: &'static [&'static str],
    pub actor: &'static str,
    pub action: &'static str,
    pub benefit: &'static str,
}

pub const CONTEXT_RULES: &[ContextRule] = &[
    ContextRule {
        keywords: &["login", "log in", "log into", "sign in", "authenticate", "password"],
        actor: "registered user",
        action: "log into my account",
        benefit: "access my personal dashboard and account features",
    },
    ContextRule {
        keywords: &["register", "sign up", "create account", "new user"],
        actor: "new user",
        action: "create an account",
        benefit: "access the platform's features and services",
    },
    ContextRule {
        keywords: &["search", "find", "lookup", "query"],
        actor: "user",
        action: "search for information",
        benefit: "quickly find what I'm looking for",
    },
    ContextRule {
        keywords: &["purchase", "buy", "order", "checkout", "cart"],
        actor: "customer",
        action: "complete a purchase",
        benefit: "buy the products I need",
    },
    ContextRule {
        keywords: &["form", "submit", "data entry", "input"],
        actor: "user",
        action: "fill out and submit a form",
        benefit: "provide the required information",
    },
    ContextRule {
        keywords: &["plp", "product list", "products", "catalog"],
        actor: "customer",
        action: "browse and view products",
        benefit: "find products that meet my needs",
    },
    ContextRule {
        keywords: &["employee", "staff", "add user", "manage"],
        actor: "administrator",
        action: "manage employee information",
        benefit: "maintain accurate records",
    },
];

pub struct NameRule {
    pub keywords: &'static [&'static str],
    pub name: &'static str,
}

pub const SCENARIO_NAME_RULES: &[NameRule] = &[
    NameRule {
        keywords: &["login", "log in", "log into", "sign in"],
        name: "User successfully logs into their account",
    },
    NameRule {
        keywords: &["register", "sign up"],
        name: "New user successfully creates an account",
    },
    NameRule {
        keywords: &["search", "find"],
        name: "User searches for information",
    },
    NameRule {
        keywords: &["purchase", "buy", "checkout"],
        name: "Customer completes a purchase",
    },
    NameRule {
        keywords: &["form", "submit"],
        name: "User successfully submits a form",
    },
    NameRule {
        keywords: &["employee", "add", "create"],
        name: "Administrator manages data successfully",
    },
];

pub struct TagRule {
    pub tag: &'static str,
    pub keywords: &'static [&'static str],
}

pub const TAG_RULES: &[TagRule] = &[
    TagRule {
        tag: "authentication",
        keywords: &["login", "log in", "log into", "sign in", "password", "auth"],
    },
    TagRule {
        tag: "registration",
        keywords: &["register", "sign up", "create account"],
    },
    TagRule {
        tag: "search",
        keywords: &["search", "find", "query"],
    },
    TagRule {
        tag: "ecommerce",
        keywords: &["purchase", "buy", "cart", "checkout"],
    },
    TagRule {
        tag: "navigation",
        keywords: &["menu", "navigate", "link"],
    },
    TagRule {
        tag: "forms",
        keywords: &["form", "input", "submit"],
    },
    TagRule {
        tag: "crud",
        keywords: &["create", "read", "update", "delete", "add", "edit"],
    },
    TagRule {
        tag: "admin",
        keywords: &["admin", "management", "employee"],
    },
    TagRule {
        tag: "critical",
        keywords: &["critical", "important"],
    },
    TagRule {
        tag: "smoke",
        keywords: &["smoke", "basic"],
    },
];

/// Role nouns the NLP tier accepts as an actor
pub const ROLE_NOUNS: &[&str] = &["user", "customer", "admin", "visitor"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_locator_rule_names_unique() {
        let names: HashSet<_> = LOCATOR_RULES.iter().map(|r| r.name.to_lowercase()).collect();
        assert_eq!(names.len(), LOCATOR_RULES.len());
    }

    #[test]
    fn test_matches_any() {
        assert!(matches_any("please log into the site", &["log into"]));
        assert!(!matches_any("nothing here", &["login", "search"]));
    }
}
