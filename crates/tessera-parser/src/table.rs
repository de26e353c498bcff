//! LALR(1) parse table construction.
//!
//! The canonical LR(1) collection is built first and then states sharing an
//! LR(0) core are merged. Tables are built once per process.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::OnceLock,
};

use log::debug;

use crate::{
    grammar::{ACCEPT_PRODUCTION, NonTerminal, PRODUCTIONS, Symbol},
    tokens::TokenKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

/// Two actions competing for the same state and lookahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Conflict {
    pub state: usize,
    pub lookahead: TokenKind,
    pub existing: Action,
    pub incoming: Action,
}

#[derive(Debug)]
pub(crate) struct ParseTable {
    actions: Vec<BTreeMap<TokenKind, Action>>,
    gotos: Vec<BTreeMap<NonTerminal, usize>>,
}

impl ParseTable {
    pub fn action(&self, state: usize, lookahead: TokenKind) -> Option<Action> {
        self.actions.get(state)?.get(&lookahead).copied()
    }

    pub fn goto(&self, state: usize, nonterminal: NonTerminal) -> Option<usize> {
        self.gotos.get(state)?.get(&nonterminal).copied()
    }

    /// Terminals with an action in `state`, in declaration order.
    pub fn expected(&self, state: usize) -> Vec<TokenKind> {
        self.actions
            .get(state)
            .map(|actions| actions.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn state_count(&self) -> usize {
        self.actions.len()
    }
}

/// Returns the shared block grammar table.
pub(crate) fn parse_table() -> &'static ParseTable {
    static TABLE: OnceLock<ParseTable> = OnceLock::new();
    TABLE.get_or_init(|| build().expect("block grammar is LALR(1)"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Item {
    production: usize,
    dot: usize,
    lookahead: TokenKind,
}

impl Item {
    fn next_symbol(self) -> Option<Symbol> {
        PRODUCTIONS[self.production].rhs.get(self.dot).copied()
    }

    fn core(self) -> (usize, usize) {
        (self.production, self.dot)
    }
}

type ItemSet = BTreeSet<Item>;

struct FirstSets {
    nullable: BTreeSet<NonTerminal>,
    first: HashMap<NonTerminal, BTreeSet<TokenKind>>,
}

impl FirstSets {
    fn compute() -> Self {
        let mut nullable = BTreeSet::new();
        let mut first: HashMap<NonTerminal, BTreeSet<TokenKind>> = HashMap::new();

        let mut changed = true;
        while changed {
            changed = false;
            for production in PRODUCTIONS {
                let mut all_nullable = true;
                let mut additions = BTreeSet::new();
                for symbol in production.rhs {
                    match symbol {
                        Symbol::Terminal(kind) => {
                            additions.insert(*kind);
                            all_nullable = false;
                        }
                        Symbol::Nonterminal(nt) => {
                            if let Some(set) = first.get(nt) {
                                additions.extend(set.iter().copied());
                            }
                            if !nullable.contains(nt) {
                                all_nullable = false;
                            }
                        }
                    }
                    if !all_nullable {
                        break;
                    }
                }

                let entry = first.entry(production.lhs).or_default();
                let before = entry.len();
                entry.extend(additions);
                changed |= entry.len() != before;

                if all_nullable && nullable.insert(production.lhs) {
                    changed = true;
                }
            }
        }

        Self { nullable, first }
    }

    /// FIRST of `symbols` followed by `lookahead`.
    fn of_sequence(&self, symbols: &[Symbol], lookahead: TokenKind) -> BTreeSet<TokenKind> {
        let mut result = BTreeSet::new();
        for symbol in symbols {
            match symbol {
                Symbol::Terminal(kind) => {
                    result.insert(*kind);
                    return result;
                }
                Symbol::Nonterminal(nt) => {
                    if let Some(set) = self.first.get(nt) {
                        result.extend(set.iter().copied());
                    }
                    if !self.nullable.contains(nt) {
                        return result;
                    }
                }
            }
        }
        result.insert(lookahead);
        result
    }
}

fn closure(items: ItemSet, firsts: &FirstSets) -> ItemSet {
    let mut result = items.clone();
    let mut pending: Vec<Item> = items.into_iter().collect();

    while let Some(item) = pending.pop() {
        let Some(Symbol::Nonterminal(nt)) = item.next_symbol() else {
            continue;
        };
        let rest = &PRODUCTIONS[item.production].rhs[item.dot + 1..];
        let lookaheads = firsts.of_sequence(rest, item.lookahead);

        for (index, production) in PRODUCTIONS.iter().enumerate() {
            if production.lhs != nt {
                continue;
            }
            for &lookahead in &lookaheads {
                let new_item = Item {
                    production: index,
                    dot: 0,
                    lookahead,
                };
                if result.insert(new_item) {
                    pending.push(new_item);
                }
            }
        }
    }

    result
}

fn goto(items: &ItemSet, symbol: Symbol, firsts: &FirstSets) -> ItemSet {
    let advanced: ItemSet = items
        .iter()
        .filter(|item| item.next_symbol() == Some(symbol))
        .map(|item| Item {
            dot: item.dot + 1,
            ..*item
        })
        .collect();
    closure(advanced, firsts)
}

struct Collection {
    states: Vec<ItemSet>,
    transitions: Vec<BTreeMap<Symbol, usize>>,
}

fn canonical_collection(firsts: &FirstSets) -> Collection {
    let start = closure(
        BTreeSet::from([Item {
            production: ACCEPT_PRODUCTION,
            dot: 0,
            lookahead: TokenKind::Eof,
        }]),
        firsts,
    );

    let mut states = vec![start.clone()];
    let mut index: HashMap<ItemSet, usize> = HashMap::from([(start, 0)]);
    let mut transitions: Vec<BTreeMap<Symbol, usize>> = vec![BTreeMap::new()];

    let mut cursor = 0;
    while cursor < states.len() {
        let symbols: BTreeSet<Symbol> = states[cursor]
            .iter()
            .filter_map(|item| item.next_symbol())
            .collect();

        for symbol in symbols {
            let target = goto(&states[cursor], symbol, firsts);
            let target_index = match index.get(&target) {
                Some(&existing) => existing,
                None => {
                    let new_index = states.len();
                    states.push(target.clone());
                    transitions.push(BTreeMap::new());
                    index.insert(target, new_index);
                    new_index
                }
            };
            transitions[cursor].insert(symbol, target_index);
        }
        cursor += 1;
    }

    Collection {
        states,
        transitions,
    }
}

/// Merges canonical states with identical cores.
fn merge_cores(collection: Collection) -> Collection {
    let mut merged_index: HashMap<BTreeSet<(usize, usize)>, usize> = HashMap::new();
    let mut mapping = Vec::with_capacity(collection.states.len());
    let mut states: Vec<ItemSet> = Vec::new();

    for state in &collection.states {
        let core: BTreeSet<(usize, usize)> = state.iter().map(|item| item.core()).collect();
        let next = merged_index.len();
        let target = *merged_index.entry(core).or_insert(next);
        if target == states.len() {
            states.push(ItemSet::new());
        }
        states[target].extend(state.iter().copied());
        mapping.push(target);
    }

    let mut transitions = vec![BTreeMap::new(); states.len()];
    for (source, edges) in collection.transitions.iter().enumerate() {
        for (&symbol, &target) in edges {
            transitions[mapping[source]].insert(symbol, mapping[target]);
        }
    }

    Collection {
        states,
        transitions,
    }
}

fn insert_action(
    actions: &mut BTreeMap<TokenKind, Action>,
    conflicts: &mut Vec<Conflict>,
    state: usize,
    lookahead: TokenKind,
    incoming: Action,
) {
    match actions.get(&lookahead) {
        Some(&existing) if existing != incoming => conflicts.push(Conflict {
            state,
            lookahead,
            existing,
            incoming,
        }),
        Some(_) => {}
        None => {
            actions.insert(lookahead, incoming);
        }
    }
}

pub(crate) fn build() -> Result<ParseTable, Vec<Conflict>> {
    let firsts = FirstSets::compute();
    let collection = merge_cores(canonical_collection(&firsts));

    let mut actions = Vec::with_capacity(collection.states.len());
    let mut gotos = Vec::with_capacity(collection.states.len());
    let mut conflicts = Vec::new();

    for (state, items) in collection.states.iter().enumerate() {
        let transitions = &collection.transitions[state];
        let mut state_actions = BTreeMap::new();
        let mut state_gotos = BTreeMap::new();

        for (&symbol, &target) in transitions {
            match symbol {
                Symbol::Terminal(kind) => insert_action(
                    &mut state_actions,
                    &mut conflicts,
                    state,
                    kind,
                    Action::Shift(target),
                ),
                Symbol::Nonterminal(nt) => {
                    state_gotos.insert(nt, target);
                }
            }
        }

        for item in items {
            if item.next_symbol().is_some() {
                continue;
            }
            let action = if item.production == ACCEPT_PRODUCTION {
                Action::Accept
            } else {
                Action::Reduce(item.production)
            };
            insert_action(
                &mut state_actions,
                &mut conflicts,
                state,
                item.lookahead,
                action,
            );
        }

        actions.push(state_actions);
        gotos.push(state_gotos);
    }

    if !conflicts.is_empty() {
        return Err(conflicts);
    }

    debug!(states = actions.len(); "Built block grammar table");
    Ok(ParseTable { actions, gotos })
}
