//! Greeting text templating.

pub const NAME_PLACEHOLDER: &str = "{name}";
pub const DATE_TIME_PLACEHOLDER: &str = "{date and time}";

/// Template containing `{name}` and `{date and time}` placeholders.
///
/// Each placeholder is replaced once, at its first occurrence, with the
/// caller's text inserted verbatim. `{name}` is substituted before
/// `{date and time}`, so a name containing `{date and time}` is itself
/// subject to the second substitution.
#[derive(Debug, Clone)]
pub struct GreetingTemplate {
    template: String,
}

impl GreetingTemplate {
    pub fn new<S: Into<String>>(template: S) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, name: &str, date_time: &str) -> String {
        self.template
            .replacen(NAME_PLACEHOLDER, name, 1)
            .replacen(DATE_TIME_PLACEHOLDER, date_time, 1)
    }
}

impl Default for GreetingTemplate {
    fn default() -> Self {
        Self::new(crate::config::defaults::DEFAULT_TEMPLATE)
    }
}
