use jass_bot::{Agent, MctsAgent, MctsConfig, RandomAgent, RuleBasedAgent};
use jass_core::game::sim::{GamePhase, GameSim};
use jass_core::model::card::Card;
use jass_core::model::card_set::CardSet;
use jass_core::model::player::PlayerPosition;
use jass_core::model::rules::TOTAL_DEAL_POINTS;

fn table(seed: u64) -> [Box<dyn Agent>; 4] {
    let mcts = MctsConfig::default().with_iterations(25);
    [
        Box::new(MctsAgent::new(mcts.with_seed(seed))),
        Box::new(RandomAgent::new(Some(seed + 1))),
        Box::new(MctsAgent::new(mcts.with_seed(seed + 2))),
        Box::new(RuleBasedAgent::new(Some(seed + 3))),
    ]
}

/// Play one deal and return the cards in play order with the team points.
fn play_deal(seed: u64, dealer: PlayerPosition) -> (Vec<Card>, [u32; 2]) {
    let mut agents = table(seed);
    let mut game = GameSim::with_seed(dealer, seed);

    while game.phase() == GamePhase::Trump {
        let seat = game.current_player();
        let choice = agents[seat.index()]
            .action_trump(&game.observation())
            .unwrap();
        game.action_trump(choice).unwrap();
    }

    let mut order = Vec::with_capacity(36);
    while !game.is_done() {
        let seat = game.current_player();
        assert_eq!(game.tricks().len(), order.len() / 4);
        let card = agents[seat.index()]
            .action_play_card(&game.observation())
            .unwrap();
        game.action_play_card(card).unwrap();
        order.push(card);
    }
    (order, game.points())
}

#[test]
fn mixed_table_completes_a_deal() {
    let (order, points) = play_deal(11, PlayerPosition::North);
    assert_eq!(order.len(), 36);
    let distinct: CardSet = order.iter().copied().collect();
    assert_eq!(distinct, CardSet::FULL);
    assert_eq!(points[0] + points[1], TOTAL_DEAL_POINTS);
}

#[test]
fn seeded_table_replays_identically() {
    let first = play_deal(5, PlayerPosition::West);
    let second = play_deal(5, PlayerPosition::West);
    assert_eq!(first, second);
}

#[test]
fn every_dealer_produces_a_complete_deal() {
    for (offset, dealer) in PlayerPosition::LOOP.iter().enumerate() {
        let (order, points) = play_deal(40 + offset as u64, *dealer);
        assert_eq!(order.len(), 36);
        assert_eq!(points.iter().sum::<u32>(), TOTAL_DEAL_POINTS);
    }
}
