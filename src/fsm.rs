//! Guarded-transition finite-state machine.
//!
//! `K` names the states (usually a small `Copy` enum) and `C` is the context
//! handed to guards and state behaviour on every tick. States are registered
//! together with their outgoing transitions; a transition pairs a target state
//! with a guard that is re-evaluated on every tick.
//!
//! # Tick contract
//! 1. The current state's transitions are scanned in declaration order and the
//!    first guard that returns `true` switches the machine to its target.
//!    At most one transition fires per tick.
//! 2. The (possibly new) current state's [`State::execute`] runs. A state that
//!    was just entered executes on the same tick it became current.
//!
//! # Usage
//! ```ignore
//! let mut fsm = StateMachine::new();
//! fsm.set_initial_state(Mode::Idle);
//! fsm.add_state(Mode::Idle, IdleState, vec![Transition::new(Mode::Busy, |c: &Ctx| c.has_work)]);
//! fsm.add_state(Mode::Busy, BusyState, vec![Transition::new(Mode::Idle, |c: &Ctx| !c.has_work)]);
//! // Each tick:
//! fsm.update(&mut ctx);
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

/// Behaviour run once per tick while the state is current.
pub trait State<C>: Send + Sync {
    fn execute(&mut self, ctx: &mut C);
}

pub type Guard<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// Edge to `to`, taken when the guard holds.
pub struct Transition<K, C> {
    pub to: K,
    guard: Guard<C>,
}

impl<K, C> Transition<K, C> {
    pub fn new(to: K, guard: impl Fn(&C) -> bool + Send + Sync + 'static) -> Self {
        Self {
            to,
            guard: Box::new(guard),
        }
    }

    pub fn is_open(&self, ctx: &C) -> bool {
        (self.guard)(ctx)
    }
}

struct Node<K, C> {
    state: Box<dyn State<C>>,
    transitions: Vec<Transition<K, C>>,
}

pub struct StateMachine<K, C> {
    nodes: HashMap<K, Node<K, C>>,
    current: Option<K>,
    /// Ticks executed in the current state, including the current one.
    ticks_in_state: u32,
}

impl<K, C> Default for StateMachine<K, C>
where
    K: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> StateMachine<K, C>
where
    K: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            current: None,
            ticks_in_state: 0,
        }
    }

    /// Pick the state the machine starts in. Runs no behaviour.
    ///
    /// # Panics
    /// If an initial state was already set.
    pub fn set_initial_state(&mut self, key: K) {
        assert!(
            self.current.is_none(),
            "initial state already set to {:?}",
            self.current
        );
        self.current = Some(key);
    }

    /// Register `state` under `key` with its outgoing transitions in priority
    /// order. Targets may name states registered later.
    pub fn add_state(
        &mut self,
        key: K,
        state: impl State<C> + 'static,
        transitions: Vec<Transition<K, C>>,
    ) {
        let previous = self.nodes.insert(
            key,
            Node {
                state: Box::new(state),
                transitions,
            },
        );
        debug_assert!(previous.is_none(), "state {key:?} registered twice");
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Run one tick. Returns the new state if a transition fired.
    ///
    /// # Panics
    /// If no initial state was set, or the current state or a transition
    /// target was never registered. Both are wiring bugs.
    pub fn update(&mut self, ctx: &mut C) -> Option<K> {
        let Some(current) = self.current else {
            panic!("StateMachine::update called before set_initial_state");
        };

        let view: &C = ctx;
        let fired = self
            .nodes
            .get(&current)
            .and_then(|node| node.transitions.iter().find(|t| t.is_open(view)))
            .map(|t| t.to);

        if let Some(next) = fired {
            assert!(
                self.nodes.contains_key(&next),
                "transition from {current:?} targets unregistered state {next:?}"
            );
            debug!(
                target: "ai",
                from = ?current,
                to = ?next,
                ticks = self.ticks_in_state,
                "state transition"
            );
            self.current = Some(next);
            self.ticks_in_state = 0;
        }

        let key = fired.unwrap_or(current);
        match self.nodes.get_mut(&key) {
            Some(node) => node.state.execute(ctx),
            None => panic!("current state {key:?} was never registered"),
        }
        self.ticks_in_state += 1;
        fired
    }
}
