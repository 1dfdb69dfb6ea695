use crate::models::{ChatMessage, PromptRequest};
use shared::types::{GeneratorError, Result};

pub const CONTEXT_PLACEHOLDER: &str = "{context}";
pub const TEST_CASE_PLACEHOLDER: &str = "{test_case}";

const DEFAULT_SYSTEM: &str = "You are an expert Python Selenium test automation engineer.
Your task is to generate a complete, executable Python function
for a Selenium test case based on the user's description.

Use the Groq API's fast inference to generate high-quality code.

Adhere to the following rules and context:
- **Do not** include the full setup/teardown boilerplate (like WebDriver setup).
  Only provide the function definition, e.g., `def test_tc_001_login():`.
- Use `from selenium.webdriver.common.by import By` for locators.
- Use `WebDriverWait` with a 10-second timeout for all element actions.
- **RAG Context:** {context}";

const DEFAULT_USER: &str =
    "Generate a Python Selenium test function for this test case: {test_case}";

/// Instruction text for the system and user roles. The rules the generated
/// code must follow live here as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub system: String,
    pub user: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM.to_string(),
            user: DEFAULT_USER.to_string(),
        }
    }
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Checks both substitution points are present.
    pub fn validate(&self) -> Result<()> {
        if !self.system.contains(CONTEXT_PLACEHOLDER) {
            return Err(GeneratorError::Format(format!(
                "system instruction has no {CONTEXT_PLACEHOLDER} placeholder"
            )));
        }
        if !self.user.contains(TEST_CASE_PLACEHOLDER) {
            return Err(GeneratorError::Format(format!(
                "user instruction has no {TEST_CASE_PLACEHOLDER} placeholder"
            )));
        }
        Ok(())
    }

    pub fn compose(&self, context: &str, query: &str) -> Result<PromptRequest> {
        self.validate()?;
        Ok(PromptRequest {
            messages: vec![
                ChatMessage::system(self.system.replace(CONTEXT_PLACEHOLDER, context)),
                ChatMessage::user(self.user.replace(TEST_CASE_PLACEHOLDER, query)),
            ],
        })
    }
}
