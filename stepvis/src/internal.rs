mod command;
mod session;

pub(crate) use command::{Command, CommandKind};
pub(crate) use session::{Actions, Factory, Session};
