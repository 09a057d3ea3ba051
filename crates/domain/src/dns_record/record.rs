/// Mail exchanger entry as reported by the host resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailExchanger {
    pub preference: u16,

    pub host: String,
}

impl MailExchanger {
    pub fn new(preference: u16, host: impl Into<String>) -> Self {
        Self {
            preference,
            host: host.into(),
        }
    }
}
