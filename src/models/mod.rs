mod process;
mod run;
mod user;

pub use process::{NewProcess, Process};
pub use run::{NewRun, Run, SeedRun};
pub use user::{NewUser, User};
