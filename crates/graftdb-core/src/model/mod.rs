mod document;
mod field;
mod registry;
mod relation;

pub use document::{DocumentModel, HydrationError};
pub use field::{FieldKind, FieldModel};
pub use registry::{TypeRegistry, TypeRegistryError};
pub use relation::{Discriminator, VirtualModel};
