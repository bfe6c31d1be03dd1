//! Named sections and the customizations that contribute to them.
//!
//! A generator exposes a closed set of sections, one enum per generator.
//! At each section it asks every customization, in registration order, for
//! a fragment and writes the non-empty ones in that order.

use std::fmt;
use std::sync::Arc;

use crate::rustlang::{RustWriter, Writable};

/// A hook point in a generator's output.
pub trait Section: fmt::Debug {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;
}

/// A contributor to the sections of type `S`.
///
/// Returning [`Writable::empty`] means "nothing to add here".
pub trait Customization<S: Section> {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Fragment for `section`.
    fn section(&self, section: &S) -> Writable<'_>;
}

/// Customizations are shared between generators built from one factory.
pub type SharedCustomization<S> = Arc<dyn Customization<S> + Send + Sync>;

/// Concatenates the non-empty fragments `customizations` produce for
/// `section`, in order. Returns an empty writable when none contribute.
#[must_use]
pub fn compose_section<'a, S: Section>(customizations: &'a [SharedCustomization<S>], section: &S) -> Writable<'a> {
    let parts: Vec<Writable<'a>> = customizations
        .iter()
        .map(|customization| customization.section(section))
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return Writable::empty();
    }
    Writable::new(move |writer| {
        for part in &parts {
            part.render(writer);
        }
    })
}

/// Writes the fragments `customizations` produce for `section`.
pub fn write_customizations<S: Section>(writer: &mut RustWriter, customizations: &[SharedCustomization<S>], section: &S) {
    tracing::trace!(section = section.name(), count = customizations.len(), "writing section");
    compose_section(customizations, section).render(writer);
}

/// Names of `customizations`, in order.
#[must_use]
pub fn customization_names<S: Section>(customizations: &[SharedCustomization<S>]) -> Vec<&str> {
    customizations.iter().map(|customization| customization.name()).collect()
}
