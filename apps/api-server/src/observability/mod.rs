//! Observability - alerting on ERROR events.

mod alert;

pub use alert::{AlertLayer, AlertMessage, AlertSender};
