//! Radix tree routing table.
//!
//! Patterns are split into `/`-separated segments and stored in a tree where:
//! - each node represents one path segment
//! - static segments (e.g., `users`) match exactly
//! - variable segments (e.g., `{id}`) match any single non-empty segment
//! - handlers are stored at terminal nodes, keyed by HTTP method, with an
//!   optional "any method" slot
//!
//! Lookup is O(k) in the number of path segments. Static children are tried
//! before variable children, and a failed branch is backtracked so that
//! `/users/me` and `/users/{id}/posts` can coexist.
//!
//! Request paths are split on raw `/` first and each segment is then
//! percent-decoded, so `%2F` stays inside its segment and `/user/id/%31`
//! captures `id = "1"`.

use crate::error::RouteError;
use crate::request::ParamVec;
use http::Method;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// One parsed segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Static(String),
    Param(Arc<str>),
}

/// Split a request path into its non-empty segments.
pub(crate) fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Percent-decode one request path segment; invalid UTF-8 keeps the raw text.
fn decode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

/// Parse a route pattern such as `/user/id/{id}`.
pub(crate) fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, RouteError> {
    let invalid = |reason| RouteError::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    };

    if !pattern.starts_with('/') {
        return Err(invalid("pattern must start with '/'"));
    }

    let mut segments = Vec::new();
    for segment in path_segments(pattern) {
        if let Some(inner) = segment.strip_prefix('{') {
            let name = inner
                .strip_suffix('}')
                .ok_or_else(|| invalid("unclosed '{' in path variable"))?;
            if name.is_empty() {
                return Err(invalid("path variable name is empty"));
            }
            if name.contains(['{', '}']) {
                return Err(invalid("nested braces in path variable"));
            }
            let duplicate = segments
                .iter()
                .any(|s| matches!(s, Segment::Param(existing) if existing.as_ref() == name));
            if duplicate {
                return Err(invalid("path variable names must be unique"));
            }
            segments.push(Segment::Param(Arc::from(name)));
        } else if segment.contains(['{', '}']) {
            return Err(invalid("path variables must span a whole segment"));
        } else {
            segments.push(Segment::Static(segment.to_string()));
        }
    }
    Ok(segments)
}

/// Outcome of a table lookup.
#[derive(Debug)]
pub(crate) enum Lookup<'a, T> {
    Found(&'a T, ParamVec),
    /// Some route matches the path but none accepts the method
    MethodNotAllowed,
    NotFound,
}

struct RadixNode<T> {
    /// Static segment text; empty for the root and for variable nodes
    segment: String,
    /// Variable name when this node captures a segment
    param_name: Option<Arc<str>>,
    /// Handlers registered for specific methods
    routes: HashMap<Method, T>,
    /// Handler registered without a method restriction
    any: Option<T>,
    children: Vec<RadixNode<T>>,
    /// Variable children; several names may share a position
    /// (e.g., /users/{id}/posts vs /users/{user_id}/comments)
    param_children: Vec<RadixNode<T>>,
}

impl<T> RadixNode<T> {
    fn new(segment: String, param_name: Option<Arc<str>>) -> Self {
        Self {
            segment,
            param_name,
            routes: HashMap::new(),
            any: None,
            children: Vec::new(),
            param_children: Vec::new(),
        }
    }

    fn is_terminal(&self) -> bool {
        self.any.is_some() || !self.routes.is_empty()
    }

    fn child_mut(&mut self, segment: &Segment) -> &mut RadixNode<T> {
        let (list, position) = match segment {
            Segment::Static(text) => {
                let pos = self.children.iter().position(|c| &c.segment == text);
                (&mut self.children, pos)
            }
            Segment::Param(name) => {
                let pos = self
                    .param_children
                    .iter()
                    .position(|c| c.param_name.as_deref() == Some(name.as_ref()));
                (&mut self.param_children, pos)
            }
        };
        let index = match position {
            Some(index) => index,
            None => {
                list.push(match segment {
                    Segment::Static(text) => RadixNode::new(text.clone(), None),
                    Segment::Param(name) => RadixNode::new(String::new(), Some(Arc::clone(name))),
                });
                list.len() - 1
            }
        };
        &mut list[index]
    }

    fn search<'a>(
        &'a self,
        segments: &[&str],
        method: &Method,
        params: &mut ParamVec,
        path_matched: &mut bool,
    ) -> Option<&'a T> {
        let Some((segment, remaining)) = segments.split_first() else {
            if self.is_terminal() {
                *path_matched = true;
            }
            return self.routes.get(method).or(self.any.as_ref());
        };

        for child in &self.children {
            if child.segment == *segment {
                if let Some(found) = child.search(remaining, method, params, path_matched) {
                    return Some(found);
                }
            }
        }

        for param_child in &self.param_children {
            if let Some(name) = &param_child.param_name {
                params.push((Arc::clone(name), (*segment).to_string()));
                if let Some(found) = param_child.search(remaining, method, params, path_matched) {
                    return Some(found);
                }
                // Backtrack: drop the capture if this branch fails
                params.pop();
            }
        }

        None
    }
}

/// The routing table: patterns to handlers.
pub(crate) struct RadixRouter<T> {
    root: RadixNode<T>,
}

impl<T> Default for RadixRouter<T> {
    fn default() -> Self {
        Self {
            root: RadixNode::new(String::new(), None),
        }
    }
}

impl<T: Clone> RadixRouter<T> {
    /// Store `value` under `pattern` for each method, or for any method when
    /// `methods` is empty.
    pub(crate) fn insert(
        &mut self,
        pattern: &str,
        segments: &[Segment],
        methods: &[Method],
        value: T,
    ) -> Result<(), RouteError> {
        let mut node = &mut self.root;
        for segment in segments {
            node = node.child_mut(segment);
        }

        let duplicate = |method: Option<&Method>| RouteError::DuplicateRoute {
            pattern: pattern.to_string(),
            method: method.cloned(),
        };
        if methods.is_empty() {
            if node.any.is_some() {
                return Err(duplicate(None));
            }
            node.any = Some(value);
            return Ok(());
        }
        if let Some(taken) = methods.iter().find(|m| node.routes.contains_key(m)) {
            return Err(duplicate(Some(taken)));
        }
        for method in methods {
            node.routes.insert(method.clone(), value.clone());
        }
        Ok(())
    }
}

impl<T> RadixRouter<T> {
    pub(crate) fn lookup(&self, method: &Method, path: &str) -> Lookup<'_, T> {
        let decoded: Vec<Cow<'_, str>> = path_segments(path).map(decode_segment).collect();
        let segments: Vec<&str> = decoded.iter().map(AsRef::as_ref).collect();
        let mut params = ParamVec::new();
        let mut path_matched = false;
        match self
            .root
            .search(&segments, method, &mut params, &mut path_matched)
        {
            Some(found) => Lookup::Found(found, params),
            None if path_matched => Lookup::MethodNotAllowed,
            None => Lookup::NotFound,
        }
    }
}
