use super::error::SearchError;
use super::node::{DealState, NodeId, SearchNode};
use jass_core::game::observation::GameObservation;
use jass_core::model::card::Card;
use jass_core::model::card_set::CardSet;
use jass_core::model::player::PlayerPosition;
use jass_core::model::rules::RuleFacade;
use jass_core::model::trump::Trump;
use rand::Rng;

const ROOT: NodeId = NodeId(0);

/// Visit statistics of one root child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildStats {
    pub card: Card,
    pub visits: u32,
    pub mean_payoff: f64,
}

/// Search tree rooted at one decision point of the searching seat.
pub struct SearchTree<'r, R> {
    rules: &'r R,
    trump: Trump,
    seat: PlayerPosition,
    exploration: f64,
    nodes: Vec<SearchNode>,
}

impl<'r, R: RuleFacade> SearchTree<'r, R> {
    /// Build a fresh tree for the seat to act in `obs`.
    pub fn from_observation(
        rules: &'r R,
        obs: &GameObservation,
        exploration: f64,
    ) -> Result<Self, SearchError> {
        obs.validate()?;
        if obs.is_terminal() {
            return Err(SearchError::TerminalObservation);
        }
        let trump = obs.trump.ok_or(SearchError::TrumpNotDeclared)?;
        let state = DealState::from_observation(obs);
        Ok(Self::from_state(rules, trump, obs.player, state, exploration))
    }

    pub fn from_state(
        rules: &'r R,
        trump: Trump,
        seat: PlayerPosition,
        state: DealState,
        exploration: f64,
    ) -> Self {
        Self {
            rules,
            trump,
            seat,
            exploration,
            nodes: vec![SearchNode::root(state)],
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn seat(&self) -> PlayerPosition {
        self.seat
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    /// Walk down through fully expanded nodes by UCB1 until reaching a node
    /// that still has unexplored actions or is terminal.
    pub fn select(&self) -> NodeId {
        let mut current = ROOT;
        loop {
            let node = self.node(current);
            if !node.fully_expanded || node.is_terminal() || node.children.is_empty() {
                return current;
            }
            current = self.best_ucb_child(current);
        }
    }

    fn ucb_score(&self, parent: &SearchNode, child: &SearchNode) -> f64 {
        debug_assert!(child.visits > 0, "selection reached an unvisited child");
        let exploration = (f64::from(parent.visits).ln() / f64::from(child.visits)).sqrt();
        child.mean_payoff() + self.exploration * exploration
    }

    fn best_ucb_child(&self, id: NodeId) -> NodeId {
        let parent = self.node(id);
        let mut best = parent.children[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child_id in &parent.children {
            let score = self.ucb_score(parent, self.node(child_id));
            if score > best_score {
                best = child_id;
                best_score = score;
            }
        }
        best
    }

    /// Materialize one unexplored action of `id` as a new child and return it.
    ///
    /// Returns `id` itself when there is nothing left to expand.
    pub fn expand(&mut self, id: NodeId) -> Result<NodeId, SearchError> {
        let node = self.node(id);
        let state = node.state;
        debug_assert_eq!(state.trick_index, state.played.len() / 4);

        if state.is_terminal() {
            self.nodes[id.index()].fully_expanded = true;
            return Ok(id);
        }

        let legal = state.legal_actions(self.seat, self.rules, self.trump);
        if legal.is_empty() {
            return Err(SearchError::EmptyLegalSet {
                seat: state.to_act,
                trick_index: state.trick_index,
            });
        }

        let explored: CardSet = node
            .children
            .iter()
            .filter_map(|child| self.node(*child).incoming_card())
            .collect();
        let unexplored = legal.difference(explored);
        if unexplored.len() <= 1 {
            self.nodes[id.index()].fully_expanded = true;
        }
        let Some(card) = unexplored.last() else {
            return Ok(id);
        };

        let mut child_state = state;
        child_state.apply(card, self.seat, self.rules, self.trump);
        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes
            .push(SearchNode::child(id, state.to_act, card, child_state));
        self.nodes[id.index()].children.push(child_id);
        Ok(child_id)
    }

    /// Play `state` out to the end of the deal with uniformly random choices.
    pub fn rollout<G: Rng + ?Sized>(
        &self,
        mut state: DealState,
        rng: &mut G,
    ) -> Result<DealState, SearchError> {
        while !state.is_terminal() {
            let legal = state.legal_actions(self.seat, self.rules, self.trump);
            let card = legal
                .choose(rng)
                .ok_or_else(|| SearchError::EmptyLegalSet {
                    seat: state.to_act,
                    trick_index: state.trick_index,
                })?;
            state.apply(card, self.seat, self.rules, self.trump);
        }
        Ok(state)
    }

    /// Payoff estimate for `id`: exact at a terminal node, a rollout otherwise.
    pub fn simulate<G: Rng + ?Sized>(&self, id: NodeId, rng: &mut G) -> Result<f64, SearchError> {
        let node = self.node(id);
        if node.is_terminal() {
            if node.fully_expanded && node.visits > 0 {
                return Ok(node.mean_payoff());
            }
            return Ok(node.state.payoff(self.seat));
        }
        let finished = self.rollout(node.state, rng)?;
        Ok(finished.payoff(self.seat))
    }

    /// Add one visit and `payoff` to every node from `id` up to the root.
    pub fn backpropagate(&mut self, id: NodeId, payoff: f64) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id.index()];
            node.visits += 1;
            node.total_payoff += payoff;
            current = node.parent;
        }
    }

    /// One select, expand, simulate, backpropagate cycle.
    pub fn iterate<G: Rng + ?Sized>(&mut self, rng: &mut G) -> Result<(), SearchError> {
        let selected = self.select();
        let expanded = self.expand(selected)?;
        let payoff = self.simulate(expanded, rng)?;
        self.backpropagate(expanded, payoff);
        Ok(())
    }

    /// True once the root has a single child that is itself fully expanded.
    pub fn is_settled(&self) -> bool {
        match self.node(ROOT).children.as_slice() {
            [only] => self.node(*only).fully_expanded,
            _ => false,
        }
    }

    /// Run up to `iterations` cycles and return how many were performed.
    pub fn run<G: Rng + ?Sized>(
        &mut self,
        iterations: usize,
        rng: &mut G,
    ) -> Result<usize, SearchError> {
        let mut performed = 0;
        for _ in 0..iterations {
            if self.is_settled() {
                break;
            }
            self.iterate(rng)?;
            performed += 1;
        }
        Ok(performed)
    }

    /// Card of the most visited root child; the first one wins ties.
    pub fn best_action(&self) -> Result<Card, SearchError> {
        let mut best: Option<&SearchNode> = None;
        for child in self.node(ROOT).children.iter().map(|id| self.node(*id)) {
            if best.is_none_or(|current| child.visits > current.visits) {
                best = Some(child);
            }
        }
        best.and_then(SearchNode::incoming_card)
            .ok_or(SearchError::NoChildren)
    }

    pub fn root_statistics(&self) -> Vec<ChildStats> {
        self.node(ROOT)
            .children
            .iter()
            .map(|id| self.node(*id))
            .filter_map(|child| {
                child.incoming_card().map(|card| ChildStats {
                    card,
                    visits: child.visits,
                    mean_payoff: child.mean_payoff(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jass_core::game::sim::GameSim;
    use jass_core::model::rules::{SchieberRules, TOTAL_DEAL_POINTS};
    use jass_core::game::observation::ObservationError;
    use jass_core::model::suit::Suit;
    use jass_core::model::trick::TrickSlots;
    use jass_core::model::trump::TrumpChoice;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Deal with `seed`, declare `trump` and play `cards` random legal cards.
    fn advanced_game(seed: u64, trump: Trump, cards: usize) -> GameSim {
        let mut game = GameSim::with_seed(PlayerPosition::North, seed);
        game.action_trump(TrumpChoice::Declare(trump)).unwrap();
        let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
        for _ in 0..cards {
            let card = game.legal_cards().choose(&mut rng).unwrap();
            game.action_play_card(card).unwrap();
        }
        game
    }

    #[test]
    fn root_visits_equal_sum_of_children() {
        let game = advanced_game(1, Trump::Suit(Suit::Hearts), 0);
        let mut tree = SearchTree::from_observation(&SchieberRules, &game.observation(), 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let performed = tree.run(60, &mut rng).unwrap();
        assert_eq!(performed, 60);

        let root = tree.node(tree.root());
        let child_sum: u32 = root.children().iter().map(|c| tree.node(*c).visits()).sum();
        assert_eq!(root.visits(), 60);
        assert_eq!(root.visits(), child_sum);
        assert!(tree.nodes().all(|(_, node)| node.visits() >= 1));
    }

    #[test]
    fn edges_play_exactly_one_card() {
        let game = advanced_game(2, Trump::ObeAbe, 5);
        let mut tree = SearchTree::from_observation(&SchieberRules, &game.observation(), 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        tree.run(80, &mut rng).unwrap();

        let seat = tree.seat();
        for (_, node) in tree.nodes() {
            let Some(parent) = node.parent() else {
                continue;
            };
            let parent = tree.node(parent);
            assert_eq!(node.state().played.len(), parent.state().played.len() + 1);
            let shrink = parent.state().own_hand.len() - node.state().own_hand.len();
            if node.actor() == Some(seat) {
                assert_eq!(shrink, 1);
            } else {
                assert_eq!(shrink, 0);
            }
            assert_eq!(node.actor(), Some(parent.player_to_act()));
            assert_eq!(node.state().trick_index, node.state().played.len() / 4);
        }
    }

    #[test]
    fn rollout_completes_deal_with_all_points() {
        let game = advanced_game(3, Trump::Suit(Suit::Clubs), 7);
        let tree = SearchTree::from_observation(&SchieberRules, &game.observation(), 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let finished = tree.rollout(tree.node(tree.root()).state, &mut rng).unwrap();
            assert_eq!(finished.played.len(), 36);
            assert_eq!(finished.trick_index, 9);
            assert!(finished.own_hand.is_empty());
            assert_eq!(finished.scores.iter().sum::<u32>(), TOTAL_DEAL_POINTS);
            let payoff = finished.payoff(tree.seat());
            assert!((0.0..=1.0).contains(&payoff));
        }
    }

    #[test]
    fn single_legal_card_expands_once_and_settles() {
        let game = advanced_game(4, Trump::UneUfe, 32);
        let obs = game.observation();
        assert_eq!(obs.hand.len(), 1);
        let mut tree = SearchTree::from_observation(&SchieberRules, &obs, 1.0).unwrap();

        let child = tree.expand(tree.root()).unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.children(), &[child]);
        assert!(root.is_fully_expanded());
        assert_eq!(tree.node(child).incoming_card(), obs.hand.first());

        let mut rng = StdRng::seed_from_u64(1);
        let mut tree = SearchTree::from_observation(&SchieberRules, &obs, 1.0).unwrap();
        let performed = tree.run(80, &mut rng).unwrap();
        assert_eq!(performed, 4);
        assert!(tree.is_settled());
        assert_eq!(tree.best_action().ok(), obs.hand.first());
    }

    #[test]
    fn terminal_payoff_is_stable() {
        let game = advanced_game(5, Trump::Suit(Suit::Diamonds), 32);
        let mut tree = SearchTree::from_observation(&SchieberRules, &game.observation(), 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        let mut id = tree.root();
        while !tree.node(id).is_terminal() {
            id = tree.expand(id).unwrap();
        }
        let exact = tree.node(id).state().payoff(tree.seat());
        let first = tree.simulate(id, &mut rng).unwrap();
        assert_eq!(first, exact);

        tree.backpropagate(id, first);
        assert_eq!(tree.expand(id).unwrap(), id);
        assert!(tree.node(id).is_fully_expanded());
        let second = tree.simulate(id, &mut rng).unwrap();
        let third = tree.simulate(id, &mut rng).unwrap();
        assert_eq!(second, third);
        assert!((second - exact).abs() < 1e-12);
    }

    #[test]
    fn same_seed_gives_same_decision() {
        let game = advanced_game(6, Trump::Suit(Suit::Spades), 2);
        let obs = game.observation();
        let decide = |seed: u64| {
            let mut tree = SearchTree::from_observation(&SchieberRules, &obs, 1.0).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            tree.run(50, &mut rng).unwrap();
            (tree.best_action().unwrap(), tree.root_statistics())
        };
        assert_eq!(decide(99), decide(99));
    }

    #[test]
    fn best_action_is_legal_and_most_visited() {
        let game = advanced_game(7, Trump::Suit(Suit::Hearts), 9);
        let obs = game.observation();
        let mut tree = SearchTree::from_observation(&SchieberRules, &obs, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        tree.run(60, &mut rng).unwrap();

        let best = tree.best_action().unwrap();
        assert!(game.legal_cards().contains(best));
        let stats = tree.root_statistics();
        let top = stats.iter().map(|s| s.visits).max().unwrap();
        let chosen = stats.iter().find(|s| s.card == best).unwrap();
        assert_eq!(chosen.visits, top);
        assert!(stats.iter().all(|s| (0.0..=1.0).contains(&s.mean_payoff)));
    }

    #[test]
    fn rejects_terminal_and_undeclared_observations() {
        let game = advanced_game(8, Trump::ObeAbe, 36);
        assert!(game.is_done());
        assert!(matches!(
            SearchTree::from_observation(&SchieberRules, &game.observation(), 1.0),
            Err(SearchError::TerminalObservation)
        ));

        let fresh = GameSim::with_seed(PlayerPosition::East, 8);
        assert!(matches!(
            SearchTree::from_observation(&SchieberRules, &fresh.observation(), 1.0),
            Err(SearchError::TrumpNotDeclared)
        ));
    }

    #[test]
    fn empty_tree_has_no_best_action() {
        let game = advanced_game(9, Trump::ObeAbe, 0);
        let tree = SearchTree::from_observation(&SchieberRules, &game.observation(), 1.0).unwrap();
        assert_eq!(tree.best_action(), Err(SearchError::NoChildren));
    }
    #[test]
    fn exhausted_hand_is_a_fatal_search_error() {
        let seat = PlayerPosition::South;
        let state = DealState {
            to_act: seat,
            leader: seat,
            trick_index: 4,
            trick: TrickSlots::EMPTY,
            played: CardSet::EMPTY,
            own_hand: CardSet::EMPTY,
            scores: [0; 4],
        };
        let mut tree = SearchTree::from_state(&SchieberRules, Trump::ObeAbe, seat, state, 1.0);
        let expected = SearchError::EmptyLegalSet {
            seat,
            trick_index: 4,
        };

        assert_eq!(tree.expand(tree.root()), Err(expected.clone()));
        assert_eq!(tree.node_count(), 1);

        let mut rng = StdRng::seed_from_u64(12);
        assert_eq!(tree.rollout(state, &mut rng), Err(expected.clone()));
        assert_eq!(tree.run(10, &mut rng), Err(expected));
    }

    #[test]
    fn malformed_observation_is_rejected() {
        let game = advanced_game(10, Trump::Suit(Suit::Clubs), 6);
        let mut obs = game.observation();
        let played = obs.tricks[0].cards[0];
        obs.hand.insert(played);

        assert_eq!(
            SearchTree::from_observation(&SchieberRules, &obs, 1.0).err(),
            Some(SearchError::InvalidObservation(
                ObservationError::HandContainsPlayedCard(played)
            ))
        );
    }
}
