//! Delegate directory over the task store.
//!
//! # Responsibility
//! - Read and maintain delegates kept as items of the delegates container.
//!
//! # Invariants
//! - Item title is the delegate short name, item notes the full name.
//! - Short names are single marker words, unique case-insensitively, and
//!   never spell a quadrant or time-period marker.

use crate::model::delegate::Delegate;
use crate::model::quadrant::{Quadrant, TimePeriod};
use crate::model::record::RawRecord;
use crate::store::{ContainerFilter, StoreError, TaskStore};
use crate::tags::extract::is_marker;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DelegateResult<T> = Result<T, DelegateError>;

#[derive(Debug)]
pub enum DelegateError {
    /// Short name is blank, reserved, or not usable as a marker word.
    InvalidShortName(String),
    DuplicateShortName(String),
    Store(StoreError),
}

impl Display for DelegateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidShortName(value) => {
                write!(f, "delegate short name `{value}` must be a single word")
            }
            Self::DuplicateShortName(value) => {
                write!(f, "delegate short name `{value}` is already in use")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DelegateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for DelegateError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Reads every delegate in `container`, sorted by short name.
pub fn list_delegates<S: TaskStore>(
    store: &S,
    container: &str,
) -> Result<Vec<Delegate>, StoreError> {
    let mut delegates: Vec<Delegate> = store
        .list(&ContainerFilter::only(container))?
        .iter()
        .map(|raw| Delegate::new(raw.id, &raw.title, &raw.notes))
        .filter(|delegate| !delegate.short_name.is_empty())
        .collect();
    delegates.sort_by_key(|delegate| delegate.short_name.to_lowercase());
    Ok(delegates)
}

/// Mutable view of the delegates container.
pub struct DelegateDirectory<'a, S: TaskStore> {
    store: &'a mut S,
    container: &'a str,
}

impl<'a, S: TaskStore> DelegateDirectory<'a, S> {
    pub fn new(store: &'a mut S, container: &'a str) -> Self {
        Self { store, container }
    }

    pub fn list(&self) -> DelegateResult<Vec<Delegate>> {
        Ok(list_delegates(&*self.store, self.container)?)
    }

    /// Adds a delegate; the short name becomes the `#short_name` marker.
    pub fn add(&mut self, short_name: &str, full_name: &str) -> DelegateResult<Delegate> {
        let short_name = validate_short_name(short_name)?;
        self.ensure_unique(&short_name, None)?;

        let raw = RawRecord::new(short_name.as_str(), full_name.trim(), self.container);
        let stored = self.store.create(&raw, self.container)?;
        info!(
            "event=delegate_add module=delegates status=ok delegate_id={}",
            stored.id
        );
        Ok(Delegate::new(stored.id, &stored.title, &stored.notes))
    }

    /// Renames a delegate. Task markers naming the old short name are left
    /// as they are.
    pub fn update(
        &mut self,
        delegate: &Delegate,
        short_name: &str,
        full_name: &str,
    ) -> DelegateResult<Delegate> {
        let short_name = validate_short_name(short_name)?;
        self.ensure_unique(&short_name, Some(delegate))?;

        let mut raw = self
            .store
            .get(delegate.id)?
            .ok_or(StoreError::NotFound(delegate.id))?;
        raw.title = short_name;
        raw.notes = full_name.trim().to_string();
        let stored = self.store.update(&raw)?;
        info!(
            "event=delegate_update module=delegates status=ok delegate_id={}",
            stored.id
        );
        Ok(Delegate::new(stored.id, &stored.title, &stored.notes))
    }

    pub fn remove(&mut self, delegate: &Delegate) -> DelegateResult<()> {
        self.store.delete(delegate.id)?;
        info!(
            "event=delegate_remove module=delegates status=ok delegate_id={}",
            delegate.id
        );
        Ok(())
    }

    fn ensure_unique(&self, short_name: &str, current: Option<&Delegate>) -> DelegateResult<()> {
        let clash = self.list()?.into_iter().any(|existing| {
            existing.short_name.eq_ignore_ascii_case(short_name)
                && current.map_or(true, |current| current.id != existing.id)
        });
        if clash {
            return Err(DelegateError::DuplicateShortName(short_name.to_string()));
        }
        Ok(())
    }
}

fn validate_short_name(short_name: &str) -> DelegateResult<String> {
    let trimmed = short_name.trim().trim_start_matches('#');
    let marker = format!("#{trimmed}");
    let reserved =
        Quadrant::from_marker(&marker).is_some() || TimePeriod::from_marker(&marker).is_some();
    if trimmed.is_empty() || !is_marker(&marker) || reserved {
        return Err(DelegateError::InvalidShortName(short_name.to_string()));
    }
    Ok(trimmed.to_string())
}
