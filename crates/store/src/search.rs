use crate::entry::Entry;

/// Keep the entries whose name contains `query`, ignoring case and
/// surrounding whitespace.
///
/// A blank query keeps everything, in the original order.
///
/// # Examples
///
/// ```
/// use filebox_store::{Action, NewEntry, Store, search};
///
/// let mut store = Store::default();
/// store.dispatch(Action::AddEntry(NewEntry::file("Quarterly Report.pdf"))).unwrap();
/// store.dispatch(Action::AddEntry(NewEntry::file("holiday.png"))).unwrap();
///
/// let hits = search(store.state().current_children(), "  REPORT ");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].name, "Quarterly Report.pdf");
/// ```
pub fn search<'a>(entries: impl IntoIterator<Item = &'a Entry>, query: &str) -> Vec<&'a Entry> {
    let query = query.trim().to_lowercase();
    entries.into_iter().filter(|entry| query.is_empty() || entry.name.to_lowercase().contains(&query)).collect()
}
