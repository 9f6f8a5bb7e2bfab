//! Access gate for operations that need a logged-in user.
//!
//! The gate is a plain decision over an already resolved principal. It never
//! touches the session or the store, so it can wrap sync and async actions
//! alike: for async work the action returns the future to await.

use crate::domain::User;

/// Outcome of [`guard`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Access<T> {
    /// The action ran and produced `T`.
    Granted(T),
    /// No principal was resolved; the caller must send the user to login.
    RedirectToLogin,
}

impl<T> Access<T> {
    /// `true` when the action ran.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

/// Run `action` with `principal`, or deny without running it.
///
/// # Examples
/// ```
/// use blog::domain::{Access, User, UserId, Username, guard};
///
/// let anonymous: Option<&User> = None;
/// assert_eq!(guard(anonymous, |_| 1), Access::RedirectToLogin);
///
/// let alice = User::new(UserId::new(1), Username::new("alice").unwrap());
/// assert_eq!(guard(Some(&alice), |u| u.id()), Access::Granted(UserId::new(1)));
/// ```
pub fn guard<'u, T, F>(principal: Option<&'u User>, action: F) -> Access<T>
where
    F: FnOnce(&'u User) -> T,
{
    match principal {
        Some(user) => Access::Granted(action(user)),
        None => Access::RedirectToLogin,
    }
}
