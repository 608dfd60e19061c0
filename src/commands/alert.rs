//! [`Alert`] command: shows its argument through the alert sink.
//!
//! Script syntax: `/alert Watch out!` (with `/` as the delimiter)

use crate::command::{Command, Context};

/// Displays the argument to the user and consumes its script slot, so the
/// line itself is never typed.
pub struct Alert;

impl Alert {
    pub const NAME: &'static str = "alert";
}

impl Command for Alert {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn execute(&self, argument: &str, ctx: &Context) -> usize {
        ctx.alert(argument);
        1
    }
}
