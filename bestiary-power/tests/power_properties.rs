use bestiary_power::{
    BestiaryData, Blow, BlowEffect, BlowMethod, Dice, MonsterRace, PowerNormalizer, RaceFlag,
    SpeedTable, SpellFlag, estimate_effective_hp,
};

fn sample_bestiary() -> BestiaryData {
    BestiaryData::from_json(include_str!("../data/sample_bestiary.json")).unwrap()
}

fn cutpurse(method: BlowMethod) -> MonsterRace {
    let mut race = MonsterRace::new(7, "Cutpurse");
    race.level = 5;
    race.avg_hp = 20;
    race.rarity = 1;
    race.experience = 2;
    race.blows
        .push(Blow::new(method, BlowEffect::EatGold, Dice::new(1, 4)));
    race
}

fn run(races: &mut [MonsterRace], rebalance: bool) -> bestiary_power::PowerOutcome {
    PowerNormalizer::new(SpeedTable::default(), rebalance)
        .run(races)
        .unwrap()
}

#[test]
fn derived_fields_never_drop_below_one() {
    for rebalance in [false, true] {
        let mut data = sample_bestiary();
        run(&mut data.races, rebalance);
        for race in &data.races {
            assert!(race.derived.hp >= 1, "{} hp", race.name);
            assert!(race.derived.power >= 1, "{} power", race.name);
            assert!(race.derived.scaled_power >= 1, "{} scaled", race.name);
            assert!(race.derived.melee_dam >= 1, "{} melee", race.name);
        }
    }
}

#[test]
fn more_immunities_never_reduce_effective_hp() {
    for (hp, armour_class) in [(15, 0), (120, 40), (2_000, 150)] {
        let mut race = MonsterRace::new(1, "Hound");
        race.level = 25;
        race.avg_hp = hp;
        race.armour_class = armour_class;
        race.flags.insert(RaceFlag::HurtLight);

        let mut previous = estimate_effective_hp(&race);
        for immunity in RaceFlag::ELEMENT_IMMUNITIES {
            race.flags.insert(immunity);
            let current = estimate_effective_hp(&race);
            assert!(
                current >= previous,
                "{immunity:?} lowered hp {previous} -> {current} (hp {hp}, ac {armour_class})"
            );
            previous = current;
        }
    }
}

#[test]
fn immobile_monsters_without_reach_are_softer() {
    let mut race = MonsterRace::new(2, "Grey mold");
    race.level = 1;
    race.avg_hp = 28;
    race.armour_class = 1;
    let mobile = estimate_effective_hp(&race);
    race.flags.insert(RaceFlag::NeverMove);
    assert!(estimate_effective_hp(&race) <= mobile);
}

#[test]
fn rebalance_off_preserves_level_rarity_and_experience() {
    let mut data = sample_bestiary();
    let before: Vec<_> = data
        .races
        .iter()
        .map(|race| (race.level, race.rarity, race.experience))
        .collect();

    run(&mut data.races, false);

    let after: Vec<_> = data
        .races
        .iter()
        .map(|race| (race.level, race.rarity, race.experience))
        .collect();
    assert_eq!(before, after);
    assert!(data.races.iter().all(|race| race.derived.power > 0));
}

#[test]
fn rerunning_without_rebalance_is_idempotent() {
    let mut data = sample_bestiary();
    let first = run(&mut data.races, false);
    let snapshot = data.races.clone();
    let second = run(&mut data.races, false);
    assert_eq!(data.races, snapshot);
    assert_eq!(first, second);
}

#[test]
fn town_monsters_have_no_experience_and_no_population() {
    let mut villager = MonsterRace::new(3, "Village idiot");
    villager.level = 0;
    villager.rarity = 5;
    villager.avg_hp = 10;

    let mut alone = vec![villager.clone()];
    let outcome = run(&mut alone, true);
    assert_eq!(alone[0].experience, 0);
    assert_eq!(alone[0].level, 0);
    assert!(outcome.aggregates.is_empty());

    let mut without = vec![cutpurse(BlowMethod::Touch)];
    let mut with = vec![cutpurse(BlowMethod::Touch), villager];
    let baseline = run(&mut without, false);
    let mixed = run(&mut with, false);
    assert_eq!(baseline.aggregates, mixed.aggregates);
    assert_eq!(with[1].experience, 0);
}

#[test]
fn reference_cutpurse_end_to_end() {
    let mut races = vec![cutpurse(BlowMethod::Touch)];
    run(&mut races, false);
    let race = &races[0];
    // (1 * 4 + 5) * 3 + 9 * 10 / 7 = 39, at 45 + 3 * 5 = 60% accuracy
    assert_eq!(race.derived.melee_dam, 23);
    assert_eq!(race.derived.spell_dam, 0);
    assert_eq!(race.derived.highest_threat, 23);
    assert_eq!(race.derived.hp, 10);
    assert_eq!(race.derived.power, 230);

    // biting cuts: 9 * 7 / 5 = 12; 36 + 120 / 7 = 53; 53 * 60 / 100
    let mut races = vec![cutpurse(BlowMethod::Bite)];
    run(&mut races, false);
    assert_eq!(races[0].derived.melee_dam, 31);
}

#[test]
fn rare_monsters_contribute_less_to_their_depth() {
    let mut common = vec![cutpurse(BlowMethod::Touch)];
    let mut rare_race = cutpurse(BlowMethod::Touch);
    rare_race.rarity = 50;
    let mut rare = vec![rare_race];

    let common_outcome = run(&mut common, false);
    let rare_outcome = run(&mut rare, false);

    assert_eq!(common[0].derived.power, rare[0].derived.power);
    let common_bucket = common_outcome.aggregates.bucket(5);
    let rare_bucket = rare_outcome.aggregates.bucket(5);
    assert_eq!((common_bucket.total_hp, common_bucket.total_dam), (10, 23));
    assert_eq!((rare_bucket.total_hp, rare_bucket.total_dam), (2, 4));
    assert!(rare_bucket.count < common_bucket.count);
}

#[test]
fn fast_wall_passing_breeders_are_stronger() {
    let breeder = |speed: u8| {
        let mut race = MonsterRace::new(4, "Giant white louse");
        race.level = 3;
        race.avg_hp = 6;
        race.rarity = 1;
        race.speed = speed;
        race.flags.insert(RaceFlag::Multiply);
        race.flags.insert(RaceFlag::PassWall);
        race.blows
            .push(Blow::new(BlowMethod::Bite, BlowEffect::Hurt, Dice::new(1, 2)));
        race
    };

    let mut slow = vec![breeder(0)];
    let mut fast = vec![breeder(130)];
    run(&mut slow, false);
    run(&mut fast, false);
    assert!(fast[0].derived.power > slow[0].derived.power);
}

#[test]
fn rebalance_assigns_positive_experience_to_every_dungeon_monster() {
    let mut data = sample_bestiary();
    let outcome = run(&mut data.races, true);
    for race in &data.races {
        if race.level == 0 {
            assert_eq!(race.experience, 0, "{}", race.name);
        } else {
            assert!(race.experience >= 1, "{}", race.name);
            assert!(race.level <= 99, "{}", race.name);
        }
    }
    assert_eq!(
        outcome.total_power,
        data.races.iter().map(|race| race.derived.scaled_power).sum::<i64>()
    );
}

#[test]
fn casters_carry_spell_damage() {
    let data = sample_bestiary();
    let mut races = data.races;
    run(&mut races, false);
    let caster = races
        .iter()
        .find(|race| race.has_spell(SpellFlag::BoFire))
        .unwrap();
    assert!(caster.derived.spell_dam > 0);
}
