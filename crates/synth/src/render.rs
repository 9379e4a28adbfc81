//! Rendering backend: one plan, four coupled artifacts
//!
//! ```text
//! <output>/<Safe>/
//! ├── Features/<Safe>.feature
//! ├── Pages/<Safe>.page.js
//! ├── Steps/<Safe>.steps.js
//! └── Tests/<Safe>.test.js
//! ```
//!
//! Names are derived once in [`ArtifactNames`]. Steps are turned into a
//! prepared view first so the templates only check action types and
//! presence of values.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use autodesign_common::naming::{capitalize_first, escape_single_quoted, lowercase_first};
use autodesign_common::{ActionType, Error, Result, StepKeyword, TestPlan};

/// Identifiers shared by all four artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactNames {
    /// Alphanumeric-only feature name; directory and file stem
    pub safe: String,

    /// Page object class, e.g. `LoginFlowPage`
    pub page_class: String,

    /// Page object variable, e.g. `loginFlowPage`
    pub page_instance: String,
}

impl ArtifactNames {
    /// Class and instance names get a `Feature` prefix when the safe name
    /// starts with a digit; the file stem keeps it as is.
    pub fn derive(plan: &TestPlan) -> Self {
        let safe = plan.safe_feature_name();
        let ident = match safe.chars().next() {
            Some(c) if c.is_ascii_digit() => format!("Feature{}", safe),
            _ => safe.clone(),
        };
        Self {
            page_class: format!("{}Page", capitalize_first(&ident)),
            page_instance: format!("{}Page", lowercase_first(&ident)),
            safe,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Feature,
    PageObject,
    Steps,
    Test,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Feature,
        ArtifactKind::PageObject,
        ArtifactKind::Steps,
        ArtifactKind::Test,
    ];

    pub fn dir(&self) -> &'static str {
        match self {
            ArtifactKind::Feature => "Features",
            ArtifactKind::PageObject => "Pages",
            ArtifactKind::Steps => "Steps",
            ArtifactKind::Test => "Tests",
        }
    }

    pub fn file_name(&self, safe: &str) -> String {
        match self {
            ArtifactKind::Feature => format!("{}.feature", safe),
            ArtifactKind::PageObject => format!("{}.page.js", safe),
            ArtifactKind::Steps => format!("{}.steps.js", safe),
            ArtifactKind::Test => format!("{}.test.js", safe),
        }
    }

    /// Path relative to the feature directory
    pub fn relative_path(&self, safe: &str) -> PathBuf {
        Path::new(self.dir()).join(self.file_name(safe))
    }
}

/// Rendered text of the four artifacts
#[derive(Debug, Clone)]
pub struct RenderedArtifacts {
    pub names: ArtifactNames,
    pub feature: String,
    pub page_object: String,
    pub steps: String,
    pub test: String,
}

impl RenderedArtifacts {
    pub fn get(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Feature => &self.feature,
            ArtifactKind::PageObject => &self.page_object,
            ArtifactKind::Steps => &self.steps,
            ArtifactKind::Test => &self.test,
        }
    }
}

/// Files written for one feature
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFiles {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// A step as the templates see it
#[derive(Debug, Clone)]
struct StepView {
    /// Keyword as written in the feature file
    keyword: StepKeyword,

    /// Keyword used to register the binding (And/But resolved)
    binding: StepKeyword,

    /// Single-line text for the feature file and test comments
    text: String,

    /// Step pattern, ready for a single-quoted JS string
    pattern: String,

    action: Option<ActionType>,
    locator: Option<String>,

    /// Fill value or navigation URL, JS-escaped
    value: Option<String>,
}

struct PlanView<'a> {
    plan: &'a TestPlan,
    names: ArtifactNames,
    feature_title: String,
    scenario_title: String,
    steps: Vec<StepView>,
}

impl<'a> PlanView<'a> {
    fn prepare(plan: &'a TestPlan) -> Self {
        let mut primary = StepKeyword::Given;
        let steps = plan
            .steps
            .iter()
            .map(|step| {
                let binding = match step.keyword {
                    StepKeyword::And | StepKeyword::But => primary,
                    keyword => {
                        primary = keyword;
                        keyword
                    }
                };
                let text = single_line(&step.text);
                StepView {
                    keyword: step.keyword,
                    binding,
                    pattern: escape_single_quoted(&escape_cucumber_expression(&text)),
                    text,
                    action: step.action_type,
                    locator: step.locator_name.clone(),
                    value: step.action_value.as_deref().map(escape_single_quoted),
                }
            })
            .collect();

        Self {
            plan,
            names: ArtifactNames::derive(plan),
            feature_title: single_line(&plan.feature_name),
            scenario_title: single_line(&plan.scenario_name),
            steps,
        }
    }
}

/// Collapse line breaks so text fits on one Gherkin or comment line
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape Cucumber expression metacharacters so the text matches literally
fn escape_cucumber_expression(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '(' | ')' | '{' | '}' | '/') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, plan: &TestPlan) -> RenderedArtifacts {
        let view = PlanView::prepare(plan);
        debug!(
            "Rendering {} ({} locator(s), {} step(s))",
            view.names.safe,
            plan.locators.len(),
            plan.steps.len()
        );

        RenderedArtifacts {
            feature: render_feature(&view),
            page_object: render_page_object(&view),
            steps: render_steps(&view),
            test: render_test(&view),
            names: view.names,
        }
    }

    /// Replace `<output_root>/<Safe>` with the rendered artifacts
    pub fn write(&self, rendered: &RenderedArtifacts, output_root: &Path) -> Result<GeneratedFiles> {
        let dir = output_root.join(&rendered.names.safe);
        let render_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| Error::Render { path, source }
        };

        if dir.exists() {
            debug!("Removing previous output {}", dir.display());
            std::fs::remove_dir_all(&dir).map_err(render_err(&dir))?;
        }

        let mut files = Vec::with_capacity(ArtifactKind::ALL.len());
        for kind in ArtifactKind::ALL {
            let path = dir.join(kind.relative_path(&rendered.names.safe));
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(render_err(parent))?;
            }
            std::fs::write(&path, rendered.get(kind)).map_err(render_err(&path))?;
            debug!("Wrote {}", path.display());
            files.push(path);
        }

        info!("Generated {} file(s) in {}", files.len(), dir.display());
        Ok(GeneratedFiles { dir, files })
    }
}

fn render_feature(view: &PlanView) -> String {
    let mut lines = Vec::new();

    if !view.plan.tags.is_empty() {
        let tags: Vec<String> = view.plan.tags.iter().map(|t| format!("@{}", t)).collect();
        lines.push(tags.join(" "));
    }
    lines.push(format!("Feature: {}", view.feature_title));

    if let Some(story) = &view.plan.user_story {
        lines.push(format!("  As a {}", single_line(&story.actor)));
        lines.push(format!("  I want to {}", single_line(&story.action)));
        lines.push(format!("  So that {}", single_line(&story.benefit)));
    }

    lines.push(String::new());
    lines.push(format!("  Scenario: {}", view.scenario_title));
    for step in &view.steps {
        lines.push(format!("    {} {}", step.keyword, step.text));
    }

    lines.push(String::new());
    lines.join("\n")
}

fn render_page_object(view: &PlanView) -> String {
    let class = &view.names.page_class;
    let mut lines = vec![
        format!("class {} {{", class),
        "  constructor(page) {".to_string(),
        "    this.page = page;".to_string(),
    ];
    for locator in &view.plan.locators {
        lines.push(format!("    this.{} = page.{};", locator.name, locator.selector));
    }
    lines.extend([
        "  }".to_string(),
        String::new(),
        "  async goto(url) {".to_string(),
        "    await this.page.goto(url);".to_string(),
        "  }".to_string(),
        "}".to_string(),
        String::new(),
        format!("module.exports = {{ {} }};", class),
        String::new(),
    ]);
    lines.join("\n")
}

fn render_steps(view: &PlanView) -> String {
    let ArtifactNames {
        safe,
        page_class,
        page_instance,
    } = &view.names;

    let mut lines = vec![
        "const { Given, When, Then } = require('@cucumber/cucumber');".to_string(),
        format!("const {{ {} }} = require('../Pages/{}.page.js');", page_class, safe),
    ];

    let mut bound = HashSet::new();
    for step in &view.steps {
        if !bound.insert(step.pattern.as_str()) {
            continue;
        }

        lines.push(String::new());
        lines.push(format!("{}('{}', async function () {{", step.binding, step.pattern));
        match (step.action, &step.locator) {
            (Some(ActionType::Navigate), _) => {
                lines.push(format!("  this.{} = new {}(this.page);", page_instance, page_class));
                if let Some(url) = &step.value {
                    lines.push(format!("  await this.{}.goto('{}');", page_instance, url));
                }
            }
            (Some(ActionType::Click), Some(locator)) => {
                lines.push(format!("  await this.{}.{}.click();", page_instance, locator));
            }
            (Some(ActionType::Fill), Some(locator)) => {
                let value = step.value.as_deref().unwrap_or_default();
                lines.push(format!("  await this.{}.{}.fill('{}');", page_instance, locator, value));
            }
            _ => lines.push("  return 'pending';".to_string()),
        }
        lines.push("});".to_string());
    }

    lines.push(String::new());
    lines.join("\n")
}

fn render_test(view: &PlanView) -> String {
    let ArtifactNames {
        safe,
        page_class,
        page_instance,
    } = &view.names;

    let mut lines = vec![
        "const { test } = require('@playwright/test');".to_string(),
        format!("const {{ {} }} = require('../Pages/{}.page.js');", page_class, safe),
        String::new(),
        format!("test.describe('{}', () => {{", escape_single_quoted(&view.feature_title)),
        format!(
            "  test('{}', async ({{ page }}) => {{",
            escape_single_quoted(&view.scenario_title)
        ),
        format!("    const {} = new {}(page);", page_instance, page_class),
    ];

    for step in &view.steps {
        lines.push(format!("    // {} {}", step.keyword, step.text));
        match (step.action, &step.locator) {
            (Some(ActionType::Navigate), _) => {
                let target = match &step.value {
                    Some(url) => format!("'{}'", url),
                    None => "process.env.APP_URL || '/'".to_string(),
                };
                lines.push(format!("    await {}.goto({});", page_instance, target));
            }
            (Some(ActionType::Click), Some(locator)) => {
                lines.push(format!("    await {}.{}.click();", page_instance, locator));
            }
            (Some(ActionType::Fill), Some(locator)) => {
                let value = step.value.as_deref().unwrap_or_default();
                lines.push(format!("    await {}.{}.fill('{}');", page_instance, locator, value));
            }
            _ => {}
        }
    }

    lines.extend(["  });".to_string(), "});".to_string(), String::new()]);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodesign_common::{Locator, Step, UserStory, StoryKind};

    fn plan() -> TestPlan {
        let mut plan = TestPlan::new("login flow", "User (admin) logs in");
        plan.locators.push(Locator::new("username", "getByLabel('Username')"));
        plan.locators.push(Locator::new("login", "getByRole('button', { name: 'Log in' })"));
        plan.steps.push(Step::navigate("I am on the application", Some("https://x.test/it's".to_string())));
        plan.steps.push(Step::fill(StepKeyword::When, "I fill the 'Username' field with 'bob'", "username", "bob"));
        plan.steps.push(Step::click(StepKeyword::And, "I click the 'Log in' button", "login"));
        plan.steps.push(Step::new(StepKeyword::Then, "I see a/b {x}"));
        plan
    }

    #[test]
    fn test_names() {
        let names = ArtifactNames::derive(&plan());
        assert_eq!(names.safe, "loginflow");
        assert_eq!(names.page_class, "LoginflowPage");
        assert_eq!(names.page_instance, "loginflowPage");
    }

    #[test]
    fn test_leading_digit_feature_keeps_identifiers_valid() {
        let mut plan = plan();
        plan.feature_name = "2FA Setup".to_string();
        let names = ArtifactNames::derive(&plan);
        assert_eq!(names.safe, "2FASetup");
        assert_eq!(names.page_class, "Feature2FASetupPage");
        assert_eq!(names.page_instance, "feature2FASetupPage");

        let artifacts = Renderer::new().render(&plan);
        let page = artifacts.get(ArtifactKind::PageObject);
        assert!(page.contains("class Feature2FASetupPage {"));
        assert!(artifacts
            .get(ArtifactKind::Steps)
            .contains("require('../Pages/2FASetup.page.js')"));
    }

    #[test]
    fn test_feature() {
        let mut plan = plan();
        plan.tags = vec!["authentication".to_string(), "smoke".to_string()];
        plan.user_story = Some(UserStory {
            actor: "user".to_string(),
            action: "log in".to_string(),
            benefit: "see my account".to_string(),
            kind: StoryKind::Formal,
        });

        let feature = Renderer::new().render(&plan).feature;
        let expected = "@authentication @smoke
Feature: login flow
  As a user
  I want to log in
  So that see my account

  Scenario: User (admin) logs in
    Given I am on the application
    When I fill the 'Username' field with 'bob'
    And I click the 'Log in' button
    Then I see a/b {x}
";
        assert_eq!(feature, expected);
    }

    #[test]
    fn test_page_object() {
        let page = Renderer::new().render(&plan()).page_object;
        assert!(page.starts_with("class LoginflowPage {"));
        assert!(page.contains("    this.username = page.getByLabel('Username');"));
        assert!(page.contains("    this.login = page.getByRole('button', { name: 'Log in' });"));
        assert!(page.contains("module.exports = { LoginflowPage };"));
    }

    #[test]
    fn test_steps_bindings() {
        let steps = Renderer::new().render(&plan()).steps;

        assert!(steps.contains("require('../Pages/loginflow.page.js')"));
        assert!(steps.contains("Given('I am on the application', async function () {"));
        assert!(steps.contains("  this.loginflowPage = new LoginflowPage(this.page);"));
        assert!(steps.contains("  await this.loginflowPage.goto('https://x.test/it\\'s');"));
        assert!(steps.contains("When('I fill the \\'Username\\' field with \\'bob\\'', async function () {"));
        assert!(steps.contains("  await this.loginflowPage.username.fill('bob');"));
        // And inherits the previous primary keyword
        assert!(steps.contains("When('I click the \\'Log in\\' button', async function () {"));
        assert!(steps.contains("Then('I see a\\\\/b \\\\{x\\\\}', async function () {"));
        assert!(steps.contains("  return 'pending';"));
    }

    #[test]
    fn test_duplicate_step_text_bound_once() {
        let mut plan = plan();
        plan.steps.push(Step::click(StepKeyword::And, "I click the 'Log in' button", "login"));
        let steps = Renderer::new().render(&plan).steps;
        assert_eq!(steps.matches("I click the \\'Log in\\' button").count(), 1);
    }

    #[test]
    fn test_playwright_test() {
        let test = Renderer::new().render(&plan()).test;
        assert!(test.contains("test.describe('login flow', () => {"));
        assert!(test.contains("  test('User (admin) logs in', async ({ page }) => {"));
        assert!(test.contains("    const loginflowPage = new LoginflowPage(page);"));
        assert!(test.contains("    await loginflowPage.goto('https://x.test/it\\'s');"));
        assert!(test.contains("    await loginflowPage.login.click();"));
    }

    #[test]
    fn test_navigation_without_url_uses_env() {
        let mut plan = plan();
        plan.steps[0] = Step::navigate("I am on the application page", None);
        let rendered = Renderer::new().render(&plan);
        assert!(rendered.test.contains("goto(process.env.APP_URL || '/')"));
        assert!(!rendered.steps.contains(".goto("));
    }

    #[test]
    fn test_multiline_text_is_flattened() {
        let mut plan = plan();
        plan.scenario_name = "first line\n  second line".to_string();
        let feature = Renderer::new().render(&plan).feature;
        assert!(feature.contains("  Scenario: first line second line\n"));
    }

    #[test]
    fn test_write_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new();
        let rendered = renderer.render(&plan());

        let stale = dir.path().join("loginflow").join("Features").join("Old.feature");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "old").unwrap();

        let generated = renderer.write(&rendered, dir.path()).unwrap();
        assert_eq!(generated.files.len(), 4);
        assert!(!stale.exists());
        for kind in ArtifactKind::ALL {
            let path = generated.dir.join(kind.relative_path("loginflow"));
            assert_eq!(std::fs::read_to_string(path).unwrap(), rendered.get(kind));
        }
    }
}
