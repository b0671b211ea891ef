use crate::auth::Identity;
use crate::middleware::{CurrentIdentity, Outcome};
use crate::views::View;

/// Landing page; greets the user when a session is present
pub fn page(identity: Option<&Identity>) -> Outcome {
    Outcome::render(View::Home {
        username: identity.map(|i| i.username.clone()),
    })
}

/// GET|POST /
pub async fn home(CurrentIdentity(identity): CurrentIdentity) -> Outcome {
    page(identity.as_ref())
}
