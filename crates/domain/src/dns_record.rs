mod record;
mod record_type;

pub use record::MailExchanger;
pub use record_type::RecordType;
