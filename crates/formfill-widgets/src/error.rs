#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("page '{path}' is not the checkout step '{route}'")]
    NotCheckoutPage { path: String, route: String },
}
