//! Breadcrumb path tracking.
//!
//! A [`BreadCrumb`] is an immutable chain of segments pointing back to the
//! root. Extending it allocates one link and shares the parent, so sibling
//! paths built during a traversal never copy each other.

use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Member(String),
    Index(String),
}

#[derive(Debug)]
struct Crumb {
    parent: BreadCrumb,
    segment: Segment,
}

/// Path from the compared roots to the current node, rendered `A.B[2].C`
#[derive(Debug, Clone, Default)]
pub struct BreadCrumb(Option<Rc<Crumb>>);

impl BreadCrumb {
    /// The empty path of the compared roots.
    pub fn root() -> Self {
        Self(None)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_none()
    }

    /// Path to a named member: `self.name`.
    pub fn member(&self, name: impl Into<String>) -> Self {
        self.push(Segment::Member(name.into()))
    }

    /// Path to an element: `self[key]`.
    pub fn index(&self, key: impl fmt::Display) -> Self {
        self.push(Segment::Index(key.to_string()))
    }

    /// Path without its last segment. The root is its own parent.
    pub fn parent(&self) -> BreadCrumb {
        match &self.0 {
            Some(crumb) => crumb.parent.clone(),
            None => BreadCrumb::root(),
        }
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = &self.0;
        while let Some(crumb) = cursor {
            depth += 1;
            cursor = &crumb.parent.0;
        }
        depth
    }

    /// Name of the last member segment, if the path ends with one.
    pub fn last_member(&self) -> Option<&str> {
        match self.0.as_deref() {
            Some(Crumb {
                segment: Segment::Member(name),
                ..
            }) => Some(name),
            _ => None,
        }
    }

    fn push(&self, segment: Segment) -> Self {
        Self(Some(Rc::new(Crumb {
            parent: self.clone(),
            segment,
        })))
    }

    fn segments(&self) -> Vec<&Segment> {
        let mut out = Vec::with_capacity(self.depth());
        let mut cursor = &self.0;
        while let Some(crumb) = cursor {
            out.push(&crumb.segment);
            cursor = &crumb.parent.0;
        }
        out.reverse();
        out
    }
}

impl fmt::Display for BreadCrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments().into_iter().enumerate() {
            match segment {
                Segment::Member(name) if i == 0 => f.write_str(name)?,
                Segment::Member(name) => write!(f, ".{name}")?,
                Segment::Index(key) => write!(f, "[{key}]")?,
            }
        }
        Ok(())
    }
}

impl PartialEq for BreadCrumb {
    fn eq(&self, other: &Self) -> bool {
        self.segments() == other.segments()
    }
}

impl Eq for BreadCrumb {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_empty() {
        assert_eq!(BreadCrumb::root().to_string(), "");
        assert!(BreadCrumb::root().is_root());
    }

    #[test]
    fn test_mixed_segments_render() {
        let path = BreadCrumb::root()
            .member("Parent")
            .member("Child")
            .index(2)
            .member("Name");
        assert_eq!(path.to_string(), "Parent.Child[2].Name");
        assert_eq!(path.depth(), 4);
        assert_eq!(path.last_member(), Some("Name"));
    }

    #[test]
    fn test_index_at_root_has_no_leading_dot() {
        let path = BreadCrumb::root().index("1002").member("DateCreated");
        assert_eq!(path.to_string(), "[1002].DateCreated");
    }

    #[test]
    fn test_siblings_share_parent_without_interference() {
        let parent = BreadCrumb::root().member("Items");
        let a = parent.index(0);
        let b = parent.index(1);
        assert_eq!(a.to_string(), "Items[0]");
        assert_eq!(b.to_string(), "Items[1]");
        assert_eq!(parent.to_string(), "Items");
        assert_eq!(a.parent(), parent);
        assert!(a.last_member().is_none());
    }
}
