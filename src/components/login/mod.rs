mod reducer;
mod view;

pub use reducer::{reduce, LoginAction, LoginState};
pub use view::LoginViewModel;
