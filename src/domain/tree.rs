//! Height-balanced (AVL) binary search tree keyed by contact id.
//!
//! Nodes own their children through `Option<Box<Node>>`; there are no parent
//! links. Every mutating helper consumes a subtree and hands back its
//! (possibly new) root, which the caller stores in the slot it took it from.
//! That return path is also where heights are refreshed and rotations applied,
//! so every ancestor of a changed node is rebalanced on the way up.

use std::cmp::Ordering;

use tracing::{instrument, trace};

use crate::domain::contact::{Contact, ContactId};
use crate::domain::error::DomainError;

type Link = Option<Box<Node>>;

/// Tree node: one contact plus the height of the subtree rooted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    contact: Contact,
    height: i32,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(contact: Contact) -> Box<Self> {
        Box::new(Self {
            contact,
            height: 1,
            left: None,
            right: None,
        })
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    /// Stored height; a leaf has height 1.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    pub fn balance_factor(&self) -> i32 {
        height(self.left()) - height(self.right())
    }

    fn update_height(&mut self) {
        self.height = 1 + height(self.left()).max(height(self.right()));
    }
}

/// Height of an optional subtree, 0 when empty.
pub fn height(node: Option<&Node>) -> i32 {
    node.map_or(0, |n| n.height)
}

/// `height(left) - height(right)`, 0 when empty.
pub fn balance_factor(node: Option<&Node>) -> i32 {
    node.map_or(0, Node::balance_factor)
}

/// Standard BST descent.
pub fn search(node: Option<&Node>, id: ContactId) -> Option<&Node> {
    let mut current = node;
    while let Some(n) = current {
        current = match id.cmp(&n.contact.id) {
            Ordering::Equal => return Some(n),
            Ordering::Less => n.left(),
            Ordering::Greater => n.right(),
        };
    }
    None
}

/// Promotes `y.left`; `y` becomes its right child. Fixes left-left.
fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Mirror of [`rotate_right`]. Fixes right-right.
fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// What changed beneath the node being rebalanced.
///
/// Insertion classifies the imbalance by where the new key went relative to
/// the heavy child. Removal uses the heavy child's balance factor, treating 0
/// as leaning the same way as its parent so a single rotation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cause {
    Insert(ContactId),
    Removal,
}

fn rebalance(mut node: Box<Node>, cause: Cause) -> Box<Node> {
    node.update_height();
    let bf = node.balance_factor();

    if bf > 1 {
        let outer = match cause {
            Cause::Insert(key) => node.left().map_or(true, |l| key < l.contact.id),
            Cause::Removal => balance_factor(node.left()) >= 0,
        };
        if outer {
            trace!(id = node.contact.id, "left-left: rotate right");
        } else {
            trace!(id = node.contact.id, "left-right: rotate left child left, then right");
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if bf < -1 {
        let outer = match cause {
            Cause::Insert(key) => node.right().map_or(true, |r| key > r.contact.id),
            Cause::Removal => balance_factor(node.right()) <= 0,
        };
        if outer {
            trace!(id = node.contact.id, "right-right: rotate left");
        } else {
            trace!(id = node.contact.id, "right-left: rotate right child right, then left");
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

/// Returns the new subtree root and whether a node was created.
fn insert(link: Link, contact: Contact) -> (Box<Node>, bool) {
    let Some(mut node) = link else {
        return (Node::leaf(contact), true);
    };

    let key = contact.id;
    let inserted = match key.cmp(&node.contact.id) {
        Ordering::Less => {
            let (child, inserted) = insert(node.left.take(), contact);
            node.left = Some(child);
            inserted
        }
        Ordering::Greater => {
            let (child, inserted) = insert(node.right.take(), contact);
            node.right = Some(child);
            inserted
        }
        // duplicate: leave the stored record alone
        Ordering::Equal => return (node, false),
    };

    if !inserted {
        return (node, false);
    }
    (rebalance(node, Cause::Insert(key)), true)
}

/// Returns the new subtree root and the removed contact, if any.
fn remove(link: Link, id: ContactId) -> (Link, Option<Contact>) {
    let Some(mut node) = link else {
        return (None, None);
    };

    let removed = match id.cmp(&node.contact.id) {
        Ordering::Less => {
            let (child, removed) = remove(node.left.take(), id);
            node.left = child;
            removed
        }
        Ordering::Greater => {
            let (child, removed) = remove(node.right.take(), id);
            node.right = child;
            removed
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, None) => return (None, Some(node.contact)),
            (Some(child), None) | (None, Some(child)) => return (Some(child), Some(node.contact)),
            (Some(left), Some(right)) => {
                // overwrite with the in-order successor, then drop its old node
                let (right, successor) = take_min(right);
                node.left = Some(left);
                node.right = right;
                Some(std::mem::replace(&mut node.contact, successor))
            }
        },
    };

    (Some(rebalance(node, Cause::Removal)), removed)
}

/// Detaches the leftmost node of `node`, rebalancing the path back up.
fn take_min(mut node: Box<Node>) -> (Link, Contact) {
    match node.left.take() {
        None => {
            let Node { contact, right, .. } = *node;
            (right, contact)
        }
        Some(left) => {
            let (left, min) = take_min(left);
            node.left = left;
            (Some(rebalance(node, Cause::Removal)), min)
        }
    }
}

fn traverse_in_order<'a, F>(node: Option<&'a Node>, visit: &mut F)
where
    F: FnMut(&'a Contact),
{
    if let Some(n) = node {
        traverse_in_order(n.left(), visit);
        visit(&n.contact);
        traverse_in_order(n.right(), visit);
    }
}

/// Contacts ordered by id, kept balanced so lookups stay O(log n).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvlTree {
    root: Link,
    len: usize,
}

impl AvlTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree, 0 when empty.
    pub fn height(&self) -> i32 {
        height(self.root())
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// Inserts `contact` unless its id is already present.
    ///
    /// Returns `false` for a duplicate id; the existing record and the shape
    /// of the tree are left untouched.
    #[instrument(level = "trace", skip(self, contact), fields(id = contact.id))]
    pub fn insert(&mut self, contact: Contact) -> bool {
        let (root, inserted) = insert(self.root.take(), contact);
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    pub fn search(&self, id: ContactId) -> Option<&Node> {
        search(self.root(), id)
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.search(id).map(Node::contact)
    }

    pub fn contains(&self, id: ContactId) -> bool {
        self.search(id).is_some()
    }

    /// Removes the contact with `id`, returning it. Absent ids are a no-op.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, id: ContactId) -> Option<Contact> {
        let (root, removed) = remove(self.root.take(), id);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Visits every contact in ascending id order.
    pub fn traverse_in_order<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&'a Contact),
    {
        traverse_in_order(self.root(), &mut visit);
    }

    pub fn in_order(&self) -> Vec<&Contact> {
        let mut contacts = Vec::with_capacity(self.len);
        self.traverse_in_order(|c| contacts.push(c));
        contacts
    }

    pub fn ids(&self) -> Vec<ContactId> {
        let mut ids = Vec::with_capacity(self.len);
        self.traverse_in_order(|c| ids.push(c.id));
        ids
    }

    /// Verifies ordering, balance, stored heights and the cached length.
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        let (_, count) = check_subtree(self.root(), None, None)?;
        if count != self.len {
            return Err(DomainError::InvariantViolation(format!(
                "cached length {} but {} nodes reachable",
                self.len, count
            )));
        }
        Ok(())
    }
}

/// Returns (height, node count) of a valid subtree whose keys lie strictly
/// between `lower` and `upper`.
fn check_subtree(
    node: Option<&Node>,
    lower: Option<ContactId>,
    upper: Option<ContactId>,
) -> Result<(i32, usize), DomainError> {
    let Some(n) = node else {
        return Ok((0, 0));
    };
    let id = n.contact.id;

    if lower.is_some_and(|lo| id <= lo) || upper.is_some_and(|hi| id >= hi) {
        return Err(DomainError::InvariantViolation(format!(
            "key {id} out of order (bounds {lower:?}..{upper:?})"
        )));
    }

    let (lh, lc) = check_subtree(n.left(), lower, Some(id))?;
    let (rh, rc) = check_subtree(n.right(), Some(id), upper)?;

    if (lh - rh).abs() > 1 {
        return Err(DomainError::InvariantViolation(format!(
            "node {id} has balance factor {}",
            lh - rh
        )));
    }
    let expected = 1 + lh.max(rh);
    if n.height != expected {
        return Err(DomainError::InvariantViolation(format!(
            "node {id} stores height {} but should be {expected}",
            n.height
        )));
    }

    Ok((expected, lc + rc + 1))
}

impl Extend<Contact> for AvlTree {
    fn extend<I: IntoIterator<Item = Contact>>(&mut self, iter: I) {
        for contact in iter {
            self.insert(contact);
        }
    }
}

impl FromIterator<Contact> for AvlTree {
    fn from_iter<I: IntoIterator<Item = Contact>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
