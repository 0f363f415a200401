//! Ambient profile context
//!
//! `set_default` installs a process-wide baseline. `push`/`pop` override it
//! for a dynamic extent on the calling thread only; other threads keep
//! seeing the baseline (or their own pushes). Code that builds documents
//! under different dialects in parallel should pass a [`ProfileRef`] to the
//! explicit `*_with` factories instead of relying on this context.

use std::cell::RefCell;
use std::sync::RwLock;

use super::ProfileRef;
use crate::error::{BuildError, Result};

static DEFAULT_PROFILE: RwLock<Option<ProfileRef>> = RwLock::new(None);

thread_local! {
    static OVERRIDES: RefCell<Vec<ProfileRef>> = const { RefCell::new(Vec::new()) };
}

/// Ambient profile accessors
pub struct ProfileContext;

impl ProfileContext {
    /// Install the process-wide baseline profile
    pub fn set_default(profile: ProfileRef) {
        tracing::debug!(profile = profile.id(), "default profile set");
        let mut slot = DEFAULT_PROFILE.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(profile);
    }

    /// The baseline profile, if one was installed
    pub fn default_profile() -> Option<ProfileRef> {
        DEFAULT_PROFILE
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Temporarily override the active profile on this thread
    pub fn push(profile: ProfileRef) {
        tracing::trace!(profile = profile.id(), "profile pushed");
        OVERRIDES.with(|stack| stack.borrow_mut().push(profile));
    }

    /// Remove the most recent override
    pub fn pop() -> Result<ProfileRef> {
        let popped = OVERRIDES.with(|stack| stack.borrow_mut().pop());
        match popped {
            Some(profile) => {
                tracing::trace!(profile = profile.id(), "profile popped");
                Ok(profile)
            }
            None => Err(BuildError::ProfileStackEmpty),
        }
    }

    /// Top of this thread's override stack, else the baseline
    pub fn current() -> Result<ProfileRef> {
        if let Some(top) = OVERRIDES.with(|stack| stack.borrow().last().cloned()) {
            return Ok(top);
        }
        Self::default_profile().ok_or(BuildError::NoActiveProfile)
    }

    /// Number of overrides active on this thread
    pub fn depth() -> usize {
        OVERRIDES.with(|stack| stack.borrow().len())
    }

    /// Run `f` with `profile` active, restoring the previous profile afterwards
    /// (also when `f` panics)
    pub fn scoped<T>(profile: ProfileRef, f: impl FnOnce() -> T) -> T {
        struct Restore(usize);

        impl Drop for Restore {
            fn drop(&mut self) {
                OVERRIDES.with(|stack| stack.borrow_mut().truncate(self.0));
            }
        }

        let _restore = Restore(Self::depth());
        Self::push(profile);
        f()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::profile::TableProfile;

    fn profile(id: &str) -> ProfileRef {
        let source = format!("id = \"{}\"\nversion = \"1.0.0\"\n", id);
        Arc::new(TableProfile::from_toml_str(&source).unwrap())
    }

    // The override stack is thread-local, so these tests never see each
    // other's pushes. None of them touch the process-wide default.

    #[test]
    fn test_push_pop_order() {
        ProfileContext::push(profile("a"));
        ProfileContext::push(profile("b"));
        assert_eq!(ProfileContext::current().unwrap().id(), "b");
        assert_eq!(ProfileContext::pop().unwrap().id(), "b");
        assert_eq!(ProfileContext::current().unwrap().id(), "a");
        assert_eq!(ProfileContext::pop().unwrap().id(), "a");
        assert_eq!(ProfileContext::depth(), 0);
    }

    #[test]
    fn test_pop_empty_stack() {
        assert!(matches!(ProfileContext::pop(), Err(BuildError::ProfileStackEmpty)));
    }

    #[test]
    fn test_scoped_restores() {
        ProfileContext::push(profile("outer"));
        let inner = ProfileContext::scoped(profile("inner"), || {
            ProfileContext::current().unwrap().id().to_string()
        });
        assert_eq!(inner, "inner");
        assert_eq!(ProfileContext::current().unwrap().id(), "outer");
        ProfileContext::pop().unwrap();
    }

    #[test]
    fn test_scoped_restores_after_unbalanced_push() {
        ProfileContext::scoped(profile("scope"), || {
            ProfileContext::push(profile("leaked"));
        });
        assert_eq!(ProfileContext::depth(), 0);
    }

    #[test]
    fn test_pushes_are_thread_local() {
        ProfileContext::push(profile("main"));
        let seen = std::thread::spawn(|| ProfileContext::depth()).join().unwrap();
        assert_eq!(seen, 0);
        ProfileContext::pop().unwrap();
    }
}
