//! Account forest reconstruction.
//!
//! Accounts arrive as a flat list with parent pointers. [`AccountTree`] stores
//! them in pre-order (every parent before its children) with a computed
//! indent, which is the order both the roll-up and the report rows rely on.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::account::{Account, ReportType};

/// Default maximum depth rendered.
pub const DEFAULT_DEPTH_CAP: usize = 20;

/// An account placed in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountNode {
    /// The account.
    pub account: Account,
    /// Distance from the top level of this selection.
    pub indent: usize,
    /// Position of the parent node, if any.
    pub parent: Option<usize>,
}

/// Accounts in depth-first pre-order.
#[derive(Debug, Clone, Default)]
pub struct AccountTree {
    nodes: Vec<AccountNode>,
    positions: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
}

impl AccountTree {
    /// Builds a tree with the default depth cap.
    #[must_use]
    pub fn build(accounts: Vec<Account>) -> Self {
        Self::build_with_depth(accounts, DEFAULT_DEPTH_CAP)
    }

    /// Builds a tree, omitting nodes at depth `depth_cap` or deeper.
    ///
    /// Accounts whose parent is not in `accounts` become top-level nodes.
    /// Duplicate names keep the first occurrence. Nodes on a parent cycle are
    /// unreachable from the top level and are left out.
    #[must_use]
    pub fn build_with_depth(accounts: Vec<Account>, depth_cap: usize) -> Self {
        let mut arena: Vec<Option<Account>> = Vec::with_capacity(accounts.len());
        let mut by_name: HashMap<String, usize> = HashMap::with_capacity(accounts.len());
        for account in accounts {
            if by_name.contains_key(&account.name) {
                continue;
            }
            by_name.insert(account.name.clone(), arena.len());
            arena.push(Some(account));
        }

        let mut roots = Vec::new();
        let mut child_index: Vec<Vec<usize>> = vec![Vec::new(); arena.len()];
        for (idx, account) in arena.iter().enumerate() {
            let parent = account
                .as_ref()
                .and_then(|a| a.parent_account.as_deref())
                .and_then(|p| by_name.get(p).copied());
            match parent {
                Some(parent) => child_index[parent].push(idx),
                None => roots.push(idx),
            }
        }

        let lookup = |idx: usize| arena[idx].as_ref();
        sort_indices(&mut roots, &lookup, true);
        for siblings in &mut child_index {
            sort_indices(siblings, &lookup, false);
        }

        // (arena index, depth, parent position)
        let mut stack: Vec<(usize, usize, Option<usize>)> =
            roots.iter().rev().map(|&idx| (idx, 0, None)).collect();
        let mut visited = vec![false; arena.len()];
        let mut order = Vec::with_capacity(arena.len());

        while let Some((idx, depth, parent)) = stack.pop() {
            if depth >= depth_cap || visited[idx] {
                continue;
            }
            visited[idx] = true;
            let position = order.len();
            order.push((idx, depth, parent));
            for &child in child_index[idx].iter().rev() {
                stack.push((child, depth + 1, Some(position)));
            }
        }

        let mut tree = Self {
            nodes: Vec::with_capacity(order.len()),
            positions: HashMap::with_capacity(order.len()),
            children: vec![Vec::new(); order.len()],
        };
        for (position, (idx, indent, parent)) in order.into_iter().enumerate() {
            let Some(account) = arena[idx].take() else {
                continue;
            };
            if let Some(parent) = parent {
                tree.children[parent].push(position);
            }
            tree.positions.insert(account.name.clone(), position);
            tree.nodes.push(AccountNode {
                account,
                indent,
                parent,
            });
        }
        tree
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in pre-order.
    #[must_use]
    pub fn nodes(&self) -> &[AccountNode] {
        &self.nodes
    }

    /// Position of an account in pre-order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Positions of a node's direct children, in display order.
    #[must_use]
    pub fn children(&self, position: usize) -> &[usize] {
        self.children
            .get(position)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of the non-group accounts in the tree.
    #[must_use]
    pub fn leaf_accounts(&self) -> BTreeSet<String> {
        self.nodes
            .iter()
            .filter(|n| !n.account.is_group)
            .map(|n| n.account.name.clone())
            .collect()
    }
}

/// Sorts sibling accounts for display.
///
/// Numbered charts sort by account number. Otherwise root-level siblings go
/// balance sheet first, then Asset, Liability, Equity, Income, Expense, then
/// by name; other siblings sort by name.
pub fn sort_accounts(accounts: &mut [Account], is_root: bool) {
    let numbered = accounts.iter().all(|a| leading_number(&a.name).is_some());
    accounts.sort_by(|a, b| compare_siblings(a, b, is_root, numbered));
}

fn sort_indices<'a, F>(indices: &mut [usize], lookup: &F, is_root: bool)
where
    F: Fn(usize) -> Option<&'a Account>,
{
    let numbered = indices
        .iter()
        .filter_map(|&i| lookup(i))
        .all(|a| leading_number(&a.name).is_some());
    indices.sort_by(|&a, &b| match (lookup(a), lookup(b)) {
        (Some(a), Some(b)) => compare_siblings(a, b, is_root, numbered),
        _ => Ordering::Equal,
    });
}

fn compare_siblings(a: &Account, b: &Account, is_root: bool, numbered: bool) -> Ordering {
    if numbered {
        let by_number = match (leading_number(&a.name), leading_number(&b.name)) {
            (Some(x), Some(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
            _ => Ordering::Equal,
        };
        return by_number.then_with(|| a.name.cmp(&b.name));
    }
    if is_root {
        let a_rank = (a.report_type != ReportType::BalanceSheet, a.root_type.priority());
        let b_rank = (b.report_type != ReportType::BalanceSheet, b.root_type.priority());
        return a_rank.cmp(&b_rank).then_with(|| a.name.cmp(&b.name));
    }
    a.name.cmp(&b.name)
}

/// The leading run of digits of a sort key, without leading zeros.
///
/// The key is split on non-word characters; only an all-digit first token
/// counts.
fn leading_number(key: &str) -> Option<&str> {
    let token = key
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()?;
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let trimmed = token.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0" } else { trimmed })
}
