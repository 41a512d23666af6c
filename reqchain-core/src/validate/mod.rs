mod references;
mod validator;

pub use references::lint_references;
pub use validator::Validator;

pub(crate) use validator::ID_RE;
