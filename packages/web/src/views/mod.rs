mod callback;
pub use callback::AuthCallback;

mod dashboard;
pub use dashboard::Dashboard;

mod home;
pub use home::Home;

mod login;
pub use login::Login;
