/// Stream tag
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    /// A `usize` with a name
    NamedUsize(String, usize),
}

/// Item tag
#[derive(Clone, Debug, PartialEq)]
pub struct ItemTag {
    /// Index of sample in buffer
    pub index: usize,
    /// [`Tag`] value
    pub tag: Tag,
}
