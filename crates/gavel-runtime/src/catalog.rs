//! Demo catalog and room seeding.

use gavel_types::{Amount, Item, Participant, ParticipantKind, Room, RoomConfig};

/// A small demonstration catalog: a spread of categories, a few marquee
/// names, and a handful of quota-limited imports.
pub fn demo_catalog() -> Vec<Item> {
    vec![
        Item::new("A. Sharma", "batter", Amount::from_units(2))
            .marquee()
            .rated(92),
        Item::new("R. Patel", "batter", Amount::from_hundredths(150)).rated(78),
        Item::new("D. Mitchell", "batter", Amount::from_units(2))
            .quota_limited()
            .marquee()
            .rated(88),
        Item::new("K. Nair", "wicketkeeper", Amount::from_units(1)).rated(71),
        Item::new("J. van Wyk", "wicketkeeper", Amount::from_hundredths(75))
            .quota_limited()
            .rated(64),
        Item::new("S. Iyer", "allrounder", Amount::from_units(2)).rated(83),
        Item::new("M. Fletcher", "allrounder", Amount::from_hundredths(150))
            .quota_limited()
            .rated(76),
        Item::new("V. Rao", "allrounder", Amount::from_hundredths(50)).rated(58),
        Item::new("T. Okafor", "pacer", Amount::from_units(2))
            .quota_limited()
            .marquee()
            .rated(90),
        Item::new("H. Bhatt", "pacer", Amount::from_units(1)).rated(69),
        Item::new("L. Fernando", "pacer", Amount::from_hundredths(75))
            .quota_limited()
            .rated(66),
        Item::new("P. Joshi", "spinner", Amount::from_hundredths(150)).rated(80),
        Item::new("E. Zulu", "spinner", Amount::from_units(1))
            .quota_limited()
            .rated(73),
        Item::new("N. Kulkarni", "spinner", Amount::from_hundredths(50)).rated(55),
        Item::new("B. Driscoll", "batter", Amount::from_hundredths(75))
            .quota_limited()
            .rated(62),
        Item::new("G. Menon", "pacer", Amount::from_hundredths(50)).rated(52),
    ]
}

/// Seat names for autonomous participants.
const AGENT_NAMES: [&str; 10] = [
    "Scout Alpha",
    "Strategist Beta",
    "Manager Gamma",
    "Analyst Delta",
    "Coach Epsilon",
    "Director Zeta",
    "Mentor Eta",
    "Tactician Theta",
    "Planner Iota",
    "Expert Kappa",
];

/// A room filled entirely with autonomous seats.
pub fn demo_room(config: RoomConfig, agent_count: usize) -> (Room, Vec<Participant>) {
    let room = Room::new("DEMO42", config);
    let seats = AGENT_NAMES
        .iter()
        .take(agent_count)
        .map(|name| Participant::new(&room, *name, ParticipantKind::Autonomous))
        .collect();
    (room, seats)
}
