//! Tests for the simulation pipeline and its observers

use std::sync::{Arc, Mutex};

use cluedo::{
    GameConfig, PlayerId,
    pipeline::{JsonlObserver, MetricsObserver, Observation, SimulationPipeline},
};

#[test]
fn test_pipeline_with_shared_metrics() {
    let config = GameConfig::new().with_players(4).with_seed(42);
    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));

    let mut pipeline =
        SimulationPipeline::new(config, 10).with_observer(Box::new(Arc::clone(&metrics)));
    let result = pipeline.run().unwrap();

    let summary = metrics.lock().unwrap().summary();
    assert_eq!(result.total_games, 10);
    assert_eq!(summary.total_games, 10);
    assert_eq!(summary.stalemates, result.stalemates);
    assert_eq!(summary.wrong_accusations, 0);
    assert_eq!(
        result.wins_per_seat.iter().sum::<usize>() + result.stalemates,
        10
    );
    let rates: f64 = PlayerId::all(4).map(|seat| result.win_rate(seat)).sum();
    assert!((rates + result.stalemate_rate() - 1.0).abs() < 1e-9);
}

#[test]
fn test_jsonl_export_matches_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.jsonl");
    let config = GameConfig::new().with_deck(5, 4).with_seed(9);
    let deck = config.deck().unwrap().shared();

    let result = SimulationPipeline::new(config, 5)
        .with_observer(Box::new(JsonlObserver::new(&path, deck).unwrap()))
        .run()
        .unwrap();

    let games: Vec<Observation> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(games.len(), 5);

    let stalemates = games.iter().filter(|g| g.winner.is_none()).count();
    assert_eq!(stalemates, result.stalemates);
    for game in &games {
        if let Some(winner) = game.winner {
            let last = game.accusations.last().unwrap();
            assert!(last.correct);
            assert_eq!(last.accuser, winner);
            assert_eq!(last.accusation, game.solution);
        }
        for suggestion in &game.suggestions {
            assert_eq!(suggestion.responder.is_some(), suggestion.shown.is_some());
        }
    }
}
