//! Arena of nested progress timers

use lapse_config::TimerConfig;
use lapse_errors::TimerError;
use lapse_events::{
    log_event, EventEmitter, EventMessage, EventSender, TimerEvent, TimerSnapshot,
};
use lapse_types::TimerId;
use tracing::{debug, trace, warn};

use crate::clock::{clock_for, Clock, SystemClock};
use crate::nest::NestSpan;
use crate::notify::{NotifyHandler, TimerView};
use crate::state::TimerState;

struct Notifier<C> {
    handler: Box<dyn NotifyHandler<C>>,
    context: C,
}

struct Node<C> {
    state: TimerState,
    notifier: Option<Notifier<C>>,
    parent: Option<TimerId>,
    /// Creation order; the last entry is the active child
    children: Vec<TimerId>,
    /// Present on nested timers only
    span: Option<NestSpan>,
}

struct Slot<C> {
    generation: u32,
    node: Option<Node<C>>,
}

/// Owner of a forest of progress timers.
///
/// Every timer lives in one slot of the arena and is addressed by a
/// [`TimerId`]. Nested timers are owned through their parent's child list;
/// destroying a timer releases its whole subtree, and any handle into that
/// subtree reports [`TimerError::Destroyed`] from then on.
///
/// The tree is single-threaded: notify handlers run synchronously inside the
/// operation that triggered them.
pub struct TimerTree<C = ()> {
    slots: Vec<Slot<C>>,
    free: Vec<usize>,
    live: usize,
    clock: Box<dyn Clock>,
    rollup: bool,
    events: Option<EventSender>,
    emit_events: bool,
}

impl<C> TimerTree<C> {
    /// Tree on the system clock, without roll-up or events
    #[must_use]
    pub fn new() -> Self {
        Self::with_boxed_clock(Box::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self::with_boxed_clock(Box::new(clock))
    }

    #[must_use]
    pub fn with_boxed_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            clock,
            rollup: false,
            events: None,
            emit_events: true,
        }
    }

    /// Tree configured from the `[timer]` section
    #[must_use]
    pub fn from_config(config: &TimerConfig) -> Self {
        let mut tree =
            Self::with_boxed_clock(clock_for(config.clock)).with_rollup(config.rollup_nested);
        tree.emit_events = config.emit_events;
        tree
    }

    /// Forward each nested `update` into the parent's fraction
    #[must_use]
    pub fn with_rollup(mut self, rollup: bool) -> Self {
        self.rollup = rollup;
        self
    }

    /// Emit lifecycle events (create, nest, reset, destroy) into `sender`
    #[must_use]
    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn rollup(&self) -> bool {
        self.rollup
    }

    /// Number of live timers, nested ones included
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn is_alive(&self, id: TimerId) -> bool {
        self.node(id).is_ok()
    }

    /// Live timers without a parent
    pub fn roots(&self) -> impl Iterator<Item = TimerId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node
                .as_ref()
                .filter(|node| node.parent.is_none())
                .map(|_| TimerId::new(index, slot.generation))
        })
    }

    /// Create a root timer that notifies `handler` with `context`
    pub fn create(&mut self, handler: impl NotifyHandler<C> + 'static, context: C) -> TimerId {
        let notifier = Notifier {
            handler: Box::new(handler),
            context,
        };
        self.create_root(Some(notifier))
    }

    /// Create a root timer without a notify handler
    pub fn create_silent(&mut self) -> TimerId {
        self.create_root(None)
    }

    fn create_root(&mut self, notifier: Option<Notifier<C>>) -> TimerId {
        let id = self.insert(Node {
            state: TimerState::started_at(self.clock.now()),
            notifier,
            parent: None,
            children: Vec::new(),
            span: None,
        });
        debug!(timer = %id, "created timer");
        self.emit(id, TimerEvent::Created { id });
        id
    }

    /// Nested timer covering the rest of `parent`'s progress
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `parent` is stale.
    pub fn new_nested(&mut self, parent: TimerId) -> Result<TimerId, TimerError> {
        let parent_fraction = self.node(parent)?.state.fraction();
        self.insert_nested(parent, NestSpan::remaining(parent_fraction))
    }

    /// Nested timer representing `share` of `parent`'s progress, starting
    /// from the parent's current fraction
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `parent` is stale.
    pub fn new_nested_with_share(
        &mut self,
        parent: TimerId,
        share: f32,
    ) -> Result<TimerId, TimerError> {
        let parent_fraction = self.node(parent)?.state.fraction();
        self.insert_nested(parent, NestSpan::with_share(parent_fraction, share))
    }

    fn insert_nested(&mut self, parent: TimerId, span: NestSpan) -> Result<TimerId, TimerError> {
        let child = self.insert(Node {
            state: TimerState::started_at(self.clock.now()),
            notifier: None,
            parent: Some(parent),
            children: Vec::new(),
            span: Some(span),
        });
        self.node_mut(parent)?.children.push(child);
        debug!(
            timer = %child,
            parent = %parent,
            span_start = span.start(),
            span_share = span.share(),
            "created nested timer"
        );
        let root = self.root_of(parent)?;
        self.emit(
            root,
            TimerEvent::NestedCreated {
                parent,
                child,
                span_start: span.start(),
                span_share: span.share(),
            },
        );
        Ok(child)
    }

    /// Destroy `child`, a direct nested timer of `parent`, and its subtree.
    /// Returns how many timers were released.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if either handle is stale and
    /// [`TimerError::NotAChild`] if `child` does not belong to `parent`.
    pub fn destroy_nested(&mut self, parent: TimerId, child: TimerId) -> Result<usize, TimerError> {
        self.node(child)?;
        let root = self.root_of(parent)?;
        let parent_node = self.node_mut(parent)?;
        let Some(position) = parent_node.children.iter().position(|&id| id == child) else {
            warn!(
                timer = %child,
                parent = %parent,
                "destroy_nested on a timer that is not a child"
            );
            return Err(TimerError::not_a_child(parent, child));
        };
        parent_node.children.remove(position);

        let released = self.release_subtree(child);
        debug!(timer = %child, parent = %parent, released, "destroyed nested timer");
        self.emit(
            root,
            TimerEvent::NestedDestroyed {
                parent,
                child,
                released,
            },
        );
        Ok(released)
    }

    /// Destroy a timer and everything nested under it. A nested timer is
    /// detached from its parent first. Returns how many timers were released.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn destroy(&mut self, id: TimerId) -> Result<usize, TimerError> {
        if let Some(parent) = self.node(id)?.parent {
            return self.destroy_nested(parent, id);
        }
        let released = self.release_subtree(id);
        debug!(timer = %id, released, "destroyed timer");
        self.emit(id, TimerEvent::Destroyed { id, released });
        Ok(released)
    }

    /// Refresh `now` and the prediction without new progress, then notify
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn touch(&mut self, id: TimerId) -> Result<(), TimerError> {
        let now = self.clock.now();
        let state = &mut self.node_mut(id)?.state;
        state.record_touch(now);
        trace!(timer = %id, now = now.as_secs(), "touched timer");
        self.notify(id)
    }

    /// Restart the timer's baseline at the current time. Nested timers are
    /// left alone and no notification is sent.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn reset(&mut self, id: TimerId) -> Result<(), TimerError> {
        let now = self.clock.now();
        self.node_mut(id)?.state.restart(now);
        debug!(timer = %id, "reset timer");
        let root = self.root_of(id)?;
        self.emit(root, TimerEvent::Reset { id });
        Ok(())
    }

    /// Report progress: clamp and store `fraction`, refresh `now` and the
    /// prediction, then notify. With roll-up enabled the scaled value is
    /// forwarded to the parent, and on up, as long as the updated timer is
    /// its parent's active child.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn update(&mut self, id: TimerId, fraction: f32) -> Result<(), TimerError> {
        let rollup = self.rollup;
        let mut target = id;
        let mut fraction = fraction;
        loop {
            let now = self.clock.now();
            let node = self.node_mut(target)?;
            node.state.record_progress(fraction, now);
            let stored = node.state.fraction();
            let forward = if rollup { node.parent.zip(node.span) } else { None };
            trace!(timer = %target, fraction = stored, now = now.as_secs(), "updated timer");
            self.notify(target)?;

            // only the active child drives its parent
            let forward = match forward {
                Some((parent, span)) if self.active_child(parent)? == Some(target) => {
                    Some((parent, span))
                }
                _ => None,
            };
            match forward {
                Some((parent, span)) => {
                    fraction = span.scale(stored);
                    target = parent;
                }
                None => return Ok(()),
            }
        }
    }

    /// Replace the state label; `None` or `""` clears it. Does not notify.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn set_state_name(&mut self, id: TimerId, name: Option<&str>) -> Result<(), TimerError> {
        let state = &mut self.node_mut(id)?.state;
        state.set_state_name(name);
        let state_name = state.state_name().map(str::to_owned);
        debug!(timer = %id, state = ?state_name, "state name changed");
        let root = self.root_of(id)?;
        self.emit(root, TimerEvent::StateChanged { id, state_name });
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn get(&self, id: TimerId) -> Result<&TimerState, TimerError> {
        Ok(&self.node(id)?.state)
    }

    /// Direct attribute access: writes bypass prediction and notification
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn fields_mut(&mut self, id: TimerId) -> Result<&mut TimerState, TimerError> {
        Ok(&mut self.node_mut(id)?.state)
    }

    /// Context supplied at creation, `None` for timers without a handler
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn context(&self, id: TimerId) -> Result<Option<&C>, TimerError> {
        Ok(self.node(id)?.notifier.as_ref().map(|n| &n.context))
    }

    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn parent(&self, id: TimerId) -> Result<Option<TimerId>, TimerError> {
        Ok(self.node(id)?.parent)
    }

    /// Nested timers in creation order
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn children(&self, id: TimerId) -> Result<&[TimerId], TimerError> {
        Ok(&self.node(id)?.children)
    }

    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn child_count(&self, id: TimerId) -> Result<usize, TimerError> {
        Ok(self.node(id)?.children.len())
    }

    /// Most recently created nested timer still alive
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn active_child(&self, id: TimerId) -> Result<Option<TimerId>, TimerError> {
        Ok(self.node(id)?.children.last().copied())
    }

    /// Span of the parent a nested timer represents, `None` for roots
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn span(&self, id: TimerId) -> Result<Option<NestSpan>, TimerError> {
        Ok(self.node(id)?.span)
    }

    /// Completion as seen through the chain of active nested timers.
    ///
    /// A timer with an active child reports that child's effective fraction
    /// scaled into the child's span; a leaf reports its own fraction. The
    /// stored fractions are not modified.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn effective_fraction(&self, id: TimerId) -> Result<f32, TimerError> {
        let mut spans = Vec::new();
        let mut current = self.node(id)?;
        while let Some(&child) = current.children.last() {
            let child_node = self.node(child)?;
            spans.push(
                child_node
                    .span
                    .unwrap_or_else(|| NestSpan::remaining(current.state.fraction())),
            );
            current = child_node;
        }
        Ok(spans
            .iter()
            .rev()
            .fold(current.state.fraction(), |fraction, span| span.scale(fraction)))
    }

    /// Number of ancestors, 0 for a root
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn depth(&self, id: TimerId) -> Result<usize, TimerError> {
        let mut depth = 0;
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            current = self.node(parent)?;
            depth += 1;
        }
        Ok(depth)
    }

    /// Outermost ancestor of `id` (itself for a root)
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn root_of(&self, id: TimerId) -> Result<TimerId, TimerError> {
        let mut root = id;
        while let Some(parent) = self.node(root)?.parent {
            root = parent;
        }
        Ok(root)
    }

    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn view(&self, id: TimerId) -> Result<TimerView<'_>, TimerError> {
        Ok(TimerView {
            id,
            state: &self.node(id)?.state,
            effective_fraction: self.effective_fraction(id)?,
            depth: self.depth(id)?,
        })
    }

    /// # Errors
    ///
    /// Returns [`TimerError::Destroyed`] if `id` is stale.
    pub fn snapshot(&self, id: TimerId) -> Result<TimerSnapshot, TimerError> {
        Ok(self.view(id)?.snapshot())
    }

    fn notify(&mut self, id: TimerId) -> Result<(), TimerError> {
        let effective_fraction = self.effective_fraction(id)?;
        let depth = self.depth(id)?;
        let Node {
            state, notifier, ..
        } = self.node_mut(id)?;
        if let Some(Notifier { handler, context }) = notifier {
            let view = TimerView {
                id,
                state,
                effective_fraction,
                depth,
            };
            handler.notify(&view, context);
        }
        Ok(())
    }

    fn emit(&self, root: TimerId, event: TimerEvent) {
        if !self.emit_events {
            return;
        }
        let Some(sender) = &self.events else {
            return;
        };
        let EventMessage { meta, event } = EventMessage::from_event(event);
        let meta = meta
            .with_correlation_id(root.to_string())
            .with_label("timer", event.timer_id().to_string());
        let message = EventMessage::new(meta, event);
        log_event(&message);
        sender.emit_with_meta(message.meta, message.event);
    }

    fn node(&self, id: TimerId) -> Result<&Node<C>, TimerError> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
            .ok_or_else(|| TimerError::destroyed(id))
    }

    fn node_mut(&mut self, id: TimerId) -> Result<&mut Node<C>, TimerError> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
            .ok_or_else(|| TimerError::destroyed(id))
    }

    fn insert(&mut self, node: Node<C>) -> TimerId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            return TimerId::new(index, slot.generation);
        }
        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 1,
            node: Some(node),
        });
        TimerId::new(index, 1)
    }

    /// Vacate `id` and all of its descendants, children before parents
    fn release_subtree(&mut self, id: TimerId) -> usize {
        let mut pending = vec![id];
        let mut order = Vec::new();
        while let Some(current) = pending.pop() {
            if let Ok(node) = self.node(current) {
                pending.extend_from_slice(&node.children);
                order.push(current);
            }
        }

        for &current in order.iter().rev() {
            let slot = &mut self.slots[current.index()];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index());
            self.live -= 1;
        }
        order.len()
    }
}

impl<C> Default for TimerTree<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for TimerTree<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerTree")
            .field("live", &self.live)
            .field("slots", &self.slots.len())
            .field("rollup", &self.rollup)
            .field("events", &self.events.is_some())
            .finish_non_exhaustive()
    }
}
