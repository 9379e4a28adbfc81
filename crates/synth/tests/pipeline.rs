//! End-to-end synthesis: strategy -> plan -> files on disk

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use autodesign_common::{ImageConfig, StepKeyword, StoryKind, TestPlan, TextConfig};
use autodesign_synth::playwright::{ActionKind, UserAction};
use autodesign_synth::{
    ArtifactKind, ImageStrategy, PlanRequest, RecordingStrategy, ScriptedDriver, SessionEvent, Synthesizer,
    TextStrategy,
};

fn assert_plan_invariants(plan: &TestPlan) {
    assert_eq!(plan.steps[0].keyword, StepKeyword::Given);
    assert_eq!(plan.steps.iter().filter(|s| s.keyword == StepKeyword::Given).count(), 1);

    let names: HashSet<String> = plan.locators.iter().map(|l| l.name.to_lowercase()).collect();
    assert_eq!(names.len(), plan.locators.len(), "duplicate locator names");

    for step in &plan.steps {
        if let Some(name) = &step.locator_name {
            assert!(plan.locator(name).is_some(), "step references unknown locator {}", name);
        }
    }
}

fn read(dir: &Path, kind: ArtifactKind, safe: &str) -> String {
    std::fs::read_to_string(dir.join(kind.relative_path(safe))).unwrap()
}

fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255])).save(&path).unwrap();
    path
}

fn click(selector: &str, text: &str) -> SessionEvent {
    SessionEvent::Action(UserAction {
        kind: ActionKind::Click,
        selector: selector.to_string(),
        text: Some(text.to_string()),
        tag: Some("button".to_string()),
        input_type: None,
        value: None,
    })
}

#[tokio::test]
async fn text_login_story_generates_consistent_artifacts() {
    let out = tempfile::tempdir().unwrap();
    let synth = Synthesizer::new(Box::new(TextStrategy::new(TextConfig::default())), out.path());

    let request = PlanRequest::new(
        "As a registered user I want to log into my account so that I access my dashboard.",
    )
    .with_feature_name("User Login");
    let report = synth.generate(&request).await.unwrap().unwrap();
    let plan = &report.plan;

    assert_plan_invariants(plan);
    let story = plan.user_story.as_ref().unwrap();
    assert_eq!(story.kind, StoryKind::Formal);
    assert!(story.actor.contains("registered user"));
    for name in ["usernameInput", "passwordInput", "loginButton"] {
        assert!(plan.locator(name).is_some(), "missing {}", name);
    }

    let dir = report.files.as_ref().unwrap().dir.clone();
    assert_eq!(dir, out.path().join("UserLogin"));

    let feature = read(&dir, ArtifactKind::Feature, "UserLogin");
    let page = read(&dir, ArtifactKind::PageObject, "UserLogin");
    let steps = read(&dir, ArtifactKind::Steps, "UserLogin");
    let test = read(&dir, ArtifactKind::Test, "UserLogin");

    assert!(feature.contains("Feature: User Login"));
    assert!(feature.contains("@authentication"));
    assert!(feature.contains("As a registered user"));

    // one class name and one instance name across the files
    assert!(page.contains("class UserLoginPage {"));
    assert!(page.contains("this.passwordInput = page.getByLabel('Password');"));
    assert!(steps.contains("require('../Pages/UserLogin.page.js')"));
    assert!(steps.contains("this.userLoginPage = new UserLoginPage(this.page);"));
    assert!(steps.contains("await this.userLoginPage.loginButton.click();"));
    assert!(test.contains("const userLoginPage = new UserLoginPage(page);"));
    assert!(test.contains("await userLoginPage.usernameInput.fill('test data');"));
}

#[tokio::test]
async fn second_run_replaces_first() {
    let out = tempfile::tempdir().unwrap();
    let synth = Synthesizer::new(Box::new(TextStrategy::new(TextConfig::default())), out.path());

    let first = PlanRequest::new("search the catalog").with_feature_name("Shop");
    let second = PlanRequest::new("add a product to the cart").with_feature_name("Shop");
    synth.generate(&first).await.unwrap().unwrap();

    let stray = out.path().join("Shop").join("Features").join("Stray.feature");
    std::fs::write(&stray, "Feature: stray").unwrap();
    synth.generate(&second).await.unwrap().unwrap();

    let feature_dir = out.path().join("Shop");
    assert_eq!(std::fs::read_dir(&feature_dir).unwrap().count(), 4);
    for kind in ArtifactKind::ALL {
        let entries: Vec<_> = std::fs::read_dir(feature_dir.join(kind.dir())).unwrap().collect();
        assert_eq!(entries.len(), 1, "{} should hold one file", kind.dir());
    }
    assert!(!stray.exists());
    assert!(read(&feature_dir, ArtifactKind::PageObject, "Shop").contains("addButton"));
}

#[tokio::test]
async fn image_without_fields_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let shots = tempfile::tempdir().unwrap();
    let image = write_png(shots.path(), "blank.png");
    std::fs::write(
        shots.path().join("blank.fields.json"),
        r#"[{"label":"Logo","type":"image"}]"#,
    )
    .unwrap();

    let synth = Synthesizer::new(Box::new(ImageStrategy::from_config(&ImageConfig::default())), out.path());
    let request = PlanRequest::new(image.to_string_lossy()).with_feature_name("Blank");

    assert!(synth.generate(&request).await.unwrap().is_none());
    assert!(!out.path().join("Blank").exists());
}

#[tokio::test]
async fn image_fields_generate_artifacts() {
    let out = tempfile::tempdir().unwrap();
    let shots = tempfile::tempdir().unwrap();
    let image = write_png(shots.path(), "login.png");
    std::fs::write(
        shots.path().join("login.fields.json"),
        r#"{"fields":[
            {"label":"E-mail","type":"text"},
            {"label":"Password","type":"text"},
            {"label":"Sign in","type":"button"}
        ]}"#,
    )
    .unwrap();

    let synth = Synthesizer::new(Box::new(ImageStrategy::from_config(&ImageConfig::default())), out.path());
    let request = PlanRequest::new(image.to_string_lossy()).with_feature_name("Login Screen");
    let report = synth.generate(&request).await.unwrap().unwrap();

    assert_plan_invariants(&report.plan);
    assert_eq!(report.plan.scenario_name, "A scenario from image login.png");

    let dir = out.path().join("LoginScreen");
    let feature = read(&dir, ArtifactKind::Feature, "LoginScreen");
    assert!(feature.contains("    When I fill the 'E-mail' field with 'test-data'"));
    assert!(feature.contains("    And I click the 'Sign in' button"));

    let page = read(&dir, ArtifactKind::PageObject, "LoginScreen");
    assert!(page.contains("this.email = page.getByLabel('E-mail');"));
    assert!(page.contains("this.signin = page.getByRole('button', { name: 'Sign in' });"));
}

#[tokio::test]
async fn recording_same_click_twice_is_one_step() {
    let out = tempfile::tempdir().unwrap();
    let driver = ScriptedDriver::new(vec![
        SessionEvent::Ready {
            title: Some("Todo App".to_string()),
        },
        click("[data-testid=\"add\"]", "Add"),
        click("[data-testid=\"add\"]", "Add"),
        SessionEvent::Closed,
    ]);

    let synth = Synthesizer::new(Box::new(RecordingStrategy::new(Box::new(driver))), out.path());
    let report = synth
        .generate(&PlanRequest::new("http://localhost:3000"))
        .await
        .unwrap()
        .unwrap();

    assert_plan_invariants(&report.plan);
    assert_eq!(report.plan.feature_name, "TodoApp");
    assert_eq!(report.plan.steps.len(), 2);
    assert_eq!(report.plan.locators.len(), 1);

    let dir = out.path().join("TodoApp");
    let steps = read(&dir, ArtifactKind::Steps, "TodoApp");
    assert!(steps.contains("await this.todoAppPage.goto('http://localhost:3000');"));
    assert!(steps.contains("await this.todoAppPage.add.click();"));
    assert_eq!(steps.matches("When(").count(), 1);
}

#[tokio::test]
async fn recording_replayed_from_session_log() {
    let out = tempfile::tempdir().unwrap();
    let log = out.path().join("session.jsonl");
    std::fs::write(
        &log,
        concat!(
            "{\"event\":\"ready\",\"title\":\"Search\"}\n",
            "{\"event\":\"action\",\"type\":\"fill\",\"selector\":\"[name=\\\"q\\\"]\",\"text\":\"Query\",\"value\":\"rust\"}\n",
            "{\"event\":\"action\",\"type\":\"click\",\"selector\":\"text=Go\",\"text\":\"Go\",\"tag\":\"input\",\"inputType\":\"submit\"}\n",
            "{\"event\":\"closed\"}\n",
        ),
    )
    .unwrap();

    let strategy = RecordingStrategy::new(Box::new(ScriptedDriver::from_jsonl(&log).unwrap()));
    let synth = Synthesizer::new(Box::new(strategy), out.path().join("generated")).dry_run(true);
    let report = synth
        .generate(&PlanRequest::new("https://search.example").with_feature_name("Web Search"))
        .await
        .unwrap()
        .unwrap();

    assert!(report.files.is_none());
    assert!(!out.path().join("generated").exists());

    let texts: Vec<&str> = report.plan.steps.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "I am on the application",
            "I fill the 'Query' field with 'rust'",
            "I click on the 'Go' button",
        ]
    );
    assert_eq!(report.plan.locators[0].selector, "locator('[name=\"q\"]')");
}
