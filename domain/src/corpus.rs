/// Reference material indexed at startup when no context file is given.
pub const DEFAULT_PASSAGES: &[&str] = &["Python Selenium Best Practices:
Always use WebDriverWait for element interactions.
Example: wait.until(EC.presence_of_element_located((By.ID, \"username\"))).send_keys(\"test\")
Use By.ID, By.NAME, or By.CSS_SELECTOR for stable locators."];

pub fn default_passages() -> Vec<String> {
    DEFAULT_PASSAGES.iter().map(|p| p.to_string()).collect()
}
