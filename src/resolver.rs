//! Request resolution: expands keywords, literal IDs, and relative indices
//! into a concrete, deduplicated, ordered list of task IDs.
//!
//! Keywords expand in a fixed order regardless of where they appear in the
//! request; remaining tokens are matched as literal IDs, then as numeric
//! indices into the previous invocation's selection. Each ID appears at
//! most once in the output, at its first insertion position.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::store::TaskStore;
use crate::task::{self, Task, ID_WIDTH};

/// How many IDs the `recent` keyword selects.
pub const RECENT_COUNT: usize = 5;

/// A reserved request token that expands to a computed set of task IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    All,
    Recent,
    Last,
    Finished,
    Virgins,
    MaxFirst,
    MinFirst,
    ByDate,
}

impl Keyword {
    /// Match a request token against the keyword set. `byprogress` is a
    /// deprecated alias of `maxfirst`.
    pub fn parse(token: &str) -> Option<Keyword> {
        match token {
            "all" => Some(Keyword::All),
            "recent" => Some(Keyword::Recent),
            "last" => Some(Keyword::Last),
            "finished" => Some(Keyword::Finished),
            "virgins" => Some(Keyword::Virgins),
            "maxfirst" | "byprogress" => Some(Keyword::MaxFirst),
            "minfirst" => Some(Keyword::MinFirst),
            "bydate" => Some(Keyword::ByDate),
            _ => None,
        }
    }
}

/// Fixed keyword evaluation order. Later keywords re-process the store
/// through different orderings, so position in the request does not matter.
const EVAL_ORDER: [Keyword; 8] = [
    Keyword::All,
    Keyword::Recent,
    Keyword::Last,
    Keyword::Finished,
    Keyword::Virgins,
    Keyword::MaxFirst,
    Keyword::MinFirst,
    Keyword::ByDate,
];

/// The outcome of resolving a request: the selected IDs in order, plus any
/// tokens that matched nothing (reported, never fatal).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub ids: Vec<String>,
    pub unresolved: Vec<String>,
}

/// Expand a request into an ordered, deduplicated ID list.
///
/// `previous` is the recency cache from the last invocation; short numeric
/// tokens index into it. The only fatal condition is `last` on an empty
/// store, which has no defined answer.
pub fn resolve(store: &TaskStore, request: &[String], previous: &[String]) -> Result<Selection> {
    let mut selection = Selection::default();
    if request.is_empty() {
        return Ok(selection);
    }

    let keywords: HashSet<Keyword> = request
        .iter()
        .filter_map(|token| Keyword::parse(token))
        .collect();

    let by_recency = ids_by_recency(store);
    let by_ratio = ids_by_ratio(store);

    let mut seen = HashSet::new();

    for keyword in EVAL_ORDER {
        if !keywords.contains(&keyword) {
            continue;
        }
        match keyword {
            Keyword::All => {
                for id in &by_recency {
                    push_unique(&mut selection.ids, &mut seen, id);
                }
            }
            Keyword::Recent => {
                for id in by_recency.iter().take(RECENT_COUNT) {
                    push_unique(&mut selection.ids, &mut seen, id);
                }
            }
            Keyword::Last => {
                let id = by_recency.first().ok_or(Error::EmptySelection)?;
                push_unique(&mut selection.ids, &mut seen, id);
            }
            Keyword::Finished => {
                for id in &by_ratio {
                    if store.get(id).is_some_and(Task::is_finished) {
                        push_unique(&mut selection.ids, &mut seen, id);
                    }
                }
            }
            Keyword::Virgins => {
                for id in &by_ratio {
                    if store.get(id).is_some_and(Task::is_virgin) {
                        push_unique(&mut selection.ids, &mut seen, id);
                    }
                }
            }
            Keyword::MaxFirst => {
                for id in &by_ratio {
                    push_unique(&mut selection.ids, &mut seen, id);
                }
            }
            Keyword::MinFirst => {
                for id in by_ratio.iter().rev() {
                    push_unique(&mut selection.ids, &mut seen, id);
                }
            }
            Keyword::ByDate => {
                for id in ids_by_creation(store) {
                    push_unique(&mut selection.ids, &mut seen, &id);
                }
            }
        }
    }

    // Keywords are consumed above; what remains is matched as a reference.
    for token in request {
        if Keyword::parse(token).is_some() {
            continue;
        }
        if store.contains(token) {
            push_unique(&mut selection.ids, &mut seen, token);
        } else if let Some(id) = relative_reference(token, previous) {
            push_unique(&mut selection.ids, &mut seen, id);
        } else {
            tracing::warn!(token = %token, "unresolved task reference");
            selection.unresolved.push(token.clone());
        }
    }

    Ok(selection)
}

/// Resolve a short numeric token against the previous selection. Index 0
/// is the first task shown or affected last time. Tokens as wide as a task
/// ID are never treated as indices.
fn relative_reference<'a>(token: &str, previous: &'a [String]) -> Option<&'a String> {
    if token.is_empty() || token.len() >= ID_WIDTH {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: usize = token.parse().ok()?;
    previous.get(index)
}

fn push_unique(ids: &mut Vec<String>, seen: &mut HashSet<String>, id: &str) {
    if seen.insert(id.to_string()) {
        ids.push(id.to_string());
    }
}

/// All IDs ordered by descending `mtime`, most recently modified first.
/// Ties keep the store's iteration order (ascending ID).
pub fn ids_by_recency(store: &TaskStore) -> Vec<String> {
    let mut entries: Vec<(&String, &Task)> = store.iter().collect();
    entries.sort_by(|a, b| b.1.mtime.cmp(&a.1.mtime));
    entries.into_iter().map(|(id, _)| id.clone()).collect()
}

/// All IDs ordered by descending progress ratio. Ties keep the store's
/// iteration order (ascending ID).
pub fn ids_by_ratio(store: &TaskStore) -> Vec<String> {
    let mut entries: Vec<(&String, &Task)> = store.iter().collect();
    entries.sort_by(|a, b| b.1.ratio().total_cmp(&a.1.ratio()));
    entries.into_iter().map(|(id, _)| id.clone()).collect()
}

/// All IDs ordered by the timestamp embedded in the ID, newest first.
/// IDs that do not parse as hex rank last.
pub fn ids_by_creation(store: &TaskStore) -> Vec<String> {
    let mut ids: Vec<&String> = store.iter().map(|(id, _)| id).collect();
    ids.sort_by_key(|id| std::cmp::Reverse(task::id_timestamp(id)));
    ids.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_aliases() {
        assert_eq!(Keyword::parse("maxfirst"), Some(Keyword::MaxFirst));
        assert_eq!(Keyword::parse("byprogress"), Some(Keyword::MaxFirst));
        assert_eq!(Keyword::parse("bydate"), Some(Keyword::ByDate));
        assert_eq!(Keyword::parse("nonsense"), None);
    }

    #[test]
    fn relative_tokens_must_be_short_and_numeric() {
        let previous = vec!["a1".to_string(), "b2".to_string()];
        assert_eq!(relative_reference("1", &previous), Some(&previous[1]));
        assert_eq!(relative_reference("2", &previous), None);
        assert_eq!(relative_reference("x", &previous), None);
        assert_eq!(relative_reference("", &previous), None);
        // a token as wide as an ID is never an index
        assert_eq!(relative_reference("00000000001", &previous), None);
    }

    #[test]
    fn empty_request_is_empty_selection() {
        let store = TaskStore::new();
        let selection = resolve(&store, &[], &[]).unwrap();
        assert!(selection.ids.is_empty());
        assert!(selection.unresolved.is_empty());
    }
}
