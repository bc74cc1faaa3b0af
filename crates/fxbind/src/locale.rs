#![forbid(unsafe_code)]

//! Observable locale context for locale-sensitive string bindings.
//!
//! The [`LocaleContext`] owns a base locale and a stack of scoped overrides.
//! The *active* locale (top override, else base) is a property, so format
//! bindings list it as a dependency and re-render when it changes.
//!
//! Each thread has a global context initialized from `LC_ALL` / `LANG`.

use std::cell::{Cell, RefCell};
use std::env;
use std::fmt;
use std::rc::Rc;

pub use fxbind_i18n::Locale;
use fxbind_i18n::normalize_locale;
use tracing::debug;

use crate::reactive::{AsDependency, ChangeListener, Dependency, ObservableValue, Property, change_listener};

thread_local! {
    static GLOBAL_CONTEXT: LocaleContext = LocaleContext::system();
}

/// Locale state with scoped overrides. Clones share state.
#[derive(Clone)]
pub struct LocaleContext {
    base: Property<Locale>,
    active: Property<Locale>,
    overrides: Rc<RefCell<Vec<Locale>>>,
    version: Rc<Cell<u64>>,
}

impl LocaleContext {
    /// Create a context with the given base locale.
    #[must_use]
    pub fn new(locale: impl Into<Locale>) -> Self {
        let locale = normalize_or_default(&locale.into());
        Self {
            base: Property::named("locale", locale.clone()),
            active: Property::named("active_locale", locale),
            overrides: Rc::new(RefCell::new(Vec::new())),
            version: Rc::new(Cell::new(0)),
        }
    }

    /// Create a context initialized from the environment.
    #[must_use]
    pub fn system() -> Self {
        Self::new(detect_system_locale())
    }

    /// The calling thread's shared context.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_CONTEXT.with(Clone::clone)
    }

    /// The active locale, honoring any scoped override.
    #[must_use]
    pub fn current_locale(&self) -> Locale {
        self.active.get()
    }

    /// The base locale without considering overrides.
    #[must_use]
    pub fn base_locale(&self) -> Locale {
        self.base.get()
    }

    /// Set the base locale.
    pub fn set_locale(&self, locale: impl Into<Locale>) {
        let locale = normalize_or_default(&locale.into());
        if self.base.get() != locale {
            self.base.store(locale);
        }
        self.refresh();
    }

    /// Push a scoped override. Dropping the guard restores the prior locale.
    #[must_use = "dropping this guard clears the locale override"]
    pub fn push_override(&self, locale: impl Into<Locale>) -> LocaleOverride {
        let locale = normalize_or_default(&locale.into());
        self.overrides.borrow_mut().push(locale.clone());
        self.refresh();
        LocaleOverride {
            context: self.clone(),
            locale,
        }
    }

    /// Call `callback` with each new active locale.
    ///
    /// The callback stays registered while the returned handle is alive.
    #[must_use = "dropping the handle unsubscribes the callback"]
    pub fn subscribe(&self, callback: impl Fn(&Locale) + 'static) -> Rc<dyn ChangeListener<Locale>> {
        let listener = change_listener(move |_: &Locale, new: &Locale| callback(new));
        self.active.add_change_listener(&listener);
        listener
    }

    /// Incremented each time the active locale changes.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    fn refresh(&self) {
        let next = self.overrides.borrow().last().cloned().unwrap_or_else(|| self.base.get());
        if self.active.get() == next {
            return;
        }
        debug!(locale = %next, "active locale changed");
        self.version.set(self.version.get() + 1);
        self.active.store(next);
    }
}

impl AsDependency for LocaleContext {
    fn as_dependency(&self) -> Dependency {
        self.active.as_dependency()
    }
}

impl fmt::Debug for LocaleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleContext")
            .field("base", &self.base.get())
            .field("active", &self.active.get())
            .field("overrides", &self.overrides.borrow().len())
            .finish()
    }
}

/// RAII guard for a scoped locale override.
#[must_use = "dropping this guard clears the locale override"]
pub struct LocaleOverride {
    context: LocaleContext,
    locale: Locale,
}

impl Drop for LocaleOverride {
    fn drop(&mut self) {
        let popped = self.context.overrides.borrow_mut().pop();
        if let Some(popped) = popped {
            debug_assert_eq!(popped, self.locale);
        }
        self.context.refresh();
    }
}

/// Detect the system locale from environment variables.
///
/// Preference order: `LC_ALL`, then `LANG`. Falls back to `"en"`.
#[must_use]
pub fn detect_system_locale() -> Locale {
    let lc_all = env::var("LC_ALL").ok();
    let lang = env::var("LANG").ok();
    detect_system_locale_from(lc_all.as_deref(), lang.as_deref())
}

/// Set the calling thread's base locale.
pub fn set_default_locale(locale: impl Into<Locale>) {
    LocaleContext::global().set_locale(locale);
}

/// The calling thread's active locale.
#[must_use]
pub fn default_locale() -> Locale {
    LocaleContext::global().current_locale()
}

fn normalize_or_default(raw: &str) -> Locale {
    normalize_locale(raw).unwrap_or_else(|| "en".to_string())
}

fn detect_system_locale_from(lc_all: Option<&str>, lang: Option<&str>) -> Locale {
    lc_all
        .and_then(normalize_locale)
        .or_else(|| lang.and_then(normalize_locale))
        .unwrap_or_else(|| "en".to_string())
}
