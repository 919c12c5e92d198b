use jass_core::game::observation::GameObservation;
use jass_core::model::card::Card;
use jass_core::model::card_set::CardSet;
use jass_core::model::player::PlayerPosition;
use jass_core::model::rules::{RuleFacade, TOTAL_DEAL_POINTS, TRICKS_PER_DEAL};
use jass_core::model::trick::TrickSlots;
use jass_core::model::trump::Trump;

/// Stable index of a node inside the search arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Enough of the deal to resume play from a node.
///
/// Only the searching seat's hand is tracked; the other three hands are
/// pooled as "every card neither held nor played".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealState {
    pub to_act: PlayerPosition,
    pub leader: PlayerPosition,
    pub trick_index: usize,
    pub trick: TrickSlots,
    pub played: CardSet,
    pub own_hand: CardSet,
    pub scores: [u32; 4],
}

impl DealState {
    /// Root state for the seat described by `obs`. The observation is assumed valid.
    pub fn from_observation(obs: &GameObservation) -> Self {
        let played = obs.played_cards();
        Self {
            to_act: obs.player,
            leader: obs.current_trick.leader(),
            trick_index: played.len() / 4,
            trick: *obs.current_trick.slots(),
            played,
            own_hand: obs.hand,
            scores: obs.seat_points(),
        }
    }

    pub fn position_in_trick(&self) -> usize {
        self.played.len() % 4
    }

    pub fn is_terminal(&self) -> bool {
        self.trick_index >= TRICKS_PER_DEAL
    }

    /// Cards held by the three other seats, pooled.
    pub fn unseen(&self) -> CardSet {
        self.played.union(self.own_hand).complement()
    }

    /// Candidate cards for the seat to act. Opponents are not held to suit.
    pub fn legal_actions<R: RuleFacade>(
        &self,
        seat: PlayerPosition,
        rules: &R,
        trump: Trump,
    ) -> CardSet {
        if self.is_terminal() {
            return CardSet::EMPTY;
        }
        if self.to_act == seat {
            rules.legal_cards(self.own_hand, &self.trick, self.position_in_trick(), trump)
        } else {
            self.unseen()
        }
    }

    /// Play `card` for the seat to act, scoring the trick when it completes.
    pub fn apply<R: RuleFacade>(
        &mut self,
        card: Card,
        seat: PlayerPosition,
        rules: &R,
        trump: Trump,
    ) {
        let actor = self.to_act;
        self.trick.push(card);
        self.played.insert(card);
        if actor == seat {
            self.own_hand.remove(card);
        }

        if !self.trick.is_complete() {
            self.to_act = actor.next();
            return;
        }

        let is_last = self.trick_index + 1 == TRICKS_PER_DEAL;
        let winner = rules.trick_winner(&self.trick, self.leader, trump);
        self.scores[winner.index()] += rules.trick_points(&self.trick, is_last, trump);
        self.trick = TrickSlots::EMPTY;
        self.leader = winner;
        self.to_act = winner;
        self.trick_index += 1;
    }

    /// Share of the deal's points taken by `seat` and its partner.
    pub fn payoff(&self, seat: PlayerPosition) -> f64 {
        let team = self.scores[seat.index()] + self.scores[seat.partner().index()];
        f64::from(team) / f64::from(TOTAL_DEAL_POINTS)
    }
}

/// One vertex of the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub(crate) state: DealState,
    pub(crate) visits: u32,
    pub(crate) total_payoff: f64,
    pub(crate) fully_expanded: bool,
    pub(crate) incoming: Option<(PlayerPosition, Card)>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SearchNode {
    pub(crate) fn root(state: DealState) -> Self {
        Self {
            state,
            visits: 0,
            total_payoff: 0.0,
            fully_expanded: false,
            incoming: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn child(parent: NodeId, actor: PlayerPosition, card: Card, state: DealState) -> Self {
        Self {
            state,
            visits: 0,
            total_payoff: 0.0,
            fully_expanded: false,
            incoming: Some((actor, card)),
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    pub fn state(&self) -> &DealState {
        &self.state
    }

    pub fn player_to_act(&self) -> PlayerPosition {
        self.state.to_act
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn total_payoff(&self) -> f64 {
        self.total_payoff
    }

    /// Empirical mean payoff, zero before the first visit.
    pub fn mean_payoff(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_payoff / f64::from(self.visits)
        }
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.fully_expanded
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn incoming_card(&self) -> Option<Card> {
        self.incoming.map(|(_, card)| card)
    }

    /// Seat that played the incoming card.
    pub fn actor(&self) -> Option<PlayerPosition> {
        self.incoming.map(|(seat, _)| seat)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
