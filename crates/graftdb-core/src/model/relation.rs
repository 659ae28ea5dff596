///
/// VirtualModel
///
/// A computed relation: no stored id, the join is an equality match of this
/// type's `local_field` against `foreign_field` on the target type.
///

#[derive(Clone, Debug)]
pub struct VirtualModel {
    name: String,
    target: String,
    local_field: String,
    foreign_field: String,
    just_one: bool,
    count: bool,
}

impl VirtualModel {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            just_one: false,
            count: false,
        }
    }

    /// Declare the relation single-valued: resolution attaches the first
    /// match (store order) instead of a list.
    #[must_use]
    pub const fn single(mut self) -> Self {
        self.just_one = true;
        self
    }

    /// Declare a count relation: resolution attaches the number of matches
    /// instead of the matches themselves.
    #[must_use]
    pub const fn counted(mut self) -> Self {
        self.count = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn local_field(&self) -> &str {
        &self.local_field
    }

    #[must_use]
    pub fn foreign_field(&self) -> &str {
        &self.foreign_field
    }

    #[must_use]
    pub const fn just_one(&self) -> bool {
        self.just_one
    }

    #[must_use]
    pub const fn count(&self) -> bool {
        self.count
    }
}

///
/// Discriminator
///
/// Marks a model as a registered subtype of `base`: rows stored in the base
/// collection whose discriminator field holds `value` hydrate as this type.
///

#[derive(Clone, Debug)]
pub struct Discriminator {
    pub base: String,
    pub value: String,
}
