use crate::game::observation::GameObservation;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::deck::Deck;
use crate::model::player::PlayerPosition;
use crate::model::rules::{RuleFacade, SchieberRules, TRICKS_PER_DEAL};
use crate::model::trick::{CompletedTrick, Trick, TrickError};
use crate::model::trump::{Forehand, Trump, TrumpChoice};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Trump,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    TrickCompleted { winner: PlayerPosition, points: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("not in the trump phase")]
    NotInTrumpPhase,
    #[error("not in the play phase")]
    NotInPlayPhase,
    #[error("trump was already pushed once")]
    PushNotAllowed,
    #[error("{seat} does not hold {card}")]
    CardNotInHand { seat: PlayerPosition, card: Card },
    #[error("{card} is not a legal play for {seat}")]
    IllegalCard { seat: PlayerPosition, card: Card },
    #[error(transparent)]
    Trick(#[from] TrickError),
}

/// Drives one complete deal: trump selection followed by nine tricks.
#[derive(Debug, Clone)]
pub struct GameSim<R = SchieberRules> {
    rules: R,
    dealer: PlayerPosition,
    hands: [CardSet; 4],
    phase: GamePhase,
    player: PlayerPosition,
    trump: Option<Trump>,
    pushed: bool,
    declared_by: Option<PlayerPosition>,
    tricks: Vec<CompletedTrick>,
    current_trick: Trick,
}

impl GameSim<SchieberRules> {
    pub fn deal(deck: &Deck, dealer: PlayerPosition) -> Self {
        Self::from_hands(SchieberRules, deck.deal(), dealer)
    }

    pub fn with_seed(dealer: PlayerPosition, seed: u64) -> Self {
        Self::deal(&Deck::shuffled_with_seed(seed), dealer)
    }
}

impl<R: RuleFacade> GameSim<R> {
    pub fn from_hands(rules: R, hands: [CardSet; 4], dealer: PlayerPosition) -> Self {
        let forehand = dealer.next();
        Self {
            rules,
            dealer,
            hands,
            phase: GamePhase::Trump,
            player: forehand,
            trump: None,
            pushed: false,
            declared_by: None,
            tricks: Vec::with_capacity(TRICKS_PER_DEAL),
            current_trick: Trick::new(forehand),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    pub fn dealer(&self) -> PlayerPosition {
        self.dealer
    }

    pub fn forehand(&self) -> PlayerPosition {
        self.dealer.next()
    }

    /// Seat that must act next.
    pub fn current_player(&self) -> PlayerPosition {
        self.player
    }

    pub fn trump(&self) -> Option<Trump> {
        self.trump
    }

    pub fn hand(&self, seat: PlayerPosition) -> CardSet {
        self.hands[seat.index()]
    }

    pub fn tricks(&self) -> &[CompletedTrick] {
        &self.tricks
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    /// Points per team (North/South, East/West).
    pub fn points(&self) -> [u32; 2] {
        let mut points = [0u32; 2];
        for trick in &self.tricks {
            points[trick.winner.team()] += trick.points;
        }
        points
    }

    pub fn observation(&self) -> GameObservation {
        self.observation_for(self.player)
    }

    pub fn observation_for(&self, seat: PlayerPosition) -> GameObservation {
        let forehand = if self.pushed {
            Forehand::Pushed
        } else if self.phase == GamePhase::Trump && seat != self.forehand() {
            Forehand::Unknown
        } else {
            Forehand::Forehand
        };
        GameObservation {
            dealer: self.dealer,
            player: seat,
            trump: self.trump,
            forehand,
            declared_by: self.declared_by,
            hand: self.hands[seat.index()],
            tricks: self.tricks.clone(),
            current_trick: self.current_trick,
        }
    }

    pub fn action_trump(&mut self, choice: TrumpChoice) -> Result<(), PlayError> {
        if self.phase != GamePhase::Trump {
            return Err(PlayError::NotInTrumpPhase);
        }
        match choice {
            TrumpChoice::Push => {
                if self.pushed {
                    return Err(PlayError::PushNotAllowed);
                }
                self.pushed = true;
                self.player = self.forehand().partner();
            }
            TrumpChoice::Declare(trump) => {
                self.trump = Some(trump);
                self.declared_by = Some(self.player);
                self.player = self.forehand();
                self.current_trick = Trick::new(self.player);
                self.phase = GamePhase::Playing;
            }
        }
        Ok(())
    }

    pub fn action_play_card(&mut self, card: Card) -> Result<PlayOutcome, PlayError> {
        let (GamePhase::Playing, Some(trump)) = (self.phase, self.trump) else {
            return Err(PlayError::NotInPlayPhase);
        };
        let seat = self.player;
        let hand = self.hands[seat.index()];
        if !hand.contains(card) {
            return Err(PlayError::CardNotInHand { seat, card });
        }
        let slots = self.current_trick.slots();
        let legal = self.rules.legal_cards(hand, slots, slots.filled(), trump);
        if !legal.contains(card) {
            return Err(PlayError::IllegalCard { seat, card });
        }

        self.current_trick.play(seat, card)?;
        self.hands[seat.index()].remove(card);

        let Some(cards) = self.current_trick.slots().complete_cards() else {
            self.player = seat.next();
            return Ok(PlayOutcome::Played);
        };

        let leader = self.current_trick.leader();
        let slots = *self.current_trick.slots();
        let is_last = self.tricks.len() + 1 == TRICKS_PER_DEAL;
        let winner = self.rules.trick_winner(&slots, leader, trump);
        let points = self.rules.trick_points(&slots, is_last, trump);
        self.tricks.push(CompletedTrick {
            cards,
            leader,
            winner,
            points,
        });
        self.player = winner;
        self.current_trick = Trick::new(winner);
        if is_last {
            self.phase = GamePhase::Finished;
        }
        Ok(PlayOutcome::TrickCompleted { winner, points })
    }

    /// Legal cards for the seat to act.
    pub fn legal_cards(&self) -> CardSet {
        match (self.phase, self.trump) {
            (GamePhase::Playing, Some(trump)) => {
                let slots = self.current_trick.slots();
                self.rules
                    .legal_cards(self.hands[self.player.index()], slots, slots.filled(), trump)
            }
            _ => CardSet::EMPTY,
        }
    }
}
