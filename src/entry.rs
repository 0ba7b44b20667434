/// A posted entry. `title` is shown escaped, `text` is shown as markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub text: String,
}

/// Fields supplied when posting; the id is assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub title: String,
    pub text: String,
}
