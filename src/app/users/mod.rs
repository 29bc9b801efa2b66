//! 用户资源

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
pub mod validation;

pub use model::{PageRequest, Pagination, User, UserInput, UserPage};
pub use repository::{MySqlUserRepository, UserRepository};
pub use service::UserService;
pub use validation::UserPayload;
