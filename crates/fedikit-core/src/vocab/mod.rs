//! The ActivityStreams 2.0 vocabulary.
//!
//! Five families: [`object`] (the `Object` root and its leaf types),
//! [`link`] (the separate `Link` root), [`activity`] (`Activity` and every
//! verb), [`actor`] (`Actor` and its five concrete subtypes), and
//! [`collection`] (`Collection` and its paging variants). Each module
//! exposes a `classes()` function returning its [`ClassDescriptor`]s;
//! [`all_classes`] concatenates them for [`crate::model::registry`].

pub mod activity;
pub mod actor;
pub mod collection;
pub mod link;
pub mod object;

use crate::model::registry::ClassDescriptor;

pub use activity::VocabActivity;
pub use actor::VocabActor;
pub use collection::VocabCollection;
pub use link::VocabLink;
pub use object::VocabObject;

pub(crate) fn all_classes() -> Vec<ClassDescriptor> {
    let mut out = Vec::new();
    out.extend(object::classes());
    out.extend(link::classes());
    out.extend(activity::classes());
    out.extend(actor::classes());
    out.extend(collection::classes());
    out
}
