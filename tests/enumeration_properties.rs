use std::cmp::Ordering;

use proptest::prelude::*;
use wordlist_gen::duplicates::exceeds_limit;
use wordlist_gen::estimate::estimate;
use wordlist_gen::{enumerate, CharsetKind, DuplicateLimits, GenOptions, Order, RunConfig};

/// Longest run the strategies produce
const MAX_LEN: usize = 4;

/// One pattern position
#[derive(Debug, Clone, Copy)]
enum Cell {
    Lower,
    Digit,
    LowerLiteral(usize),
    DigitLiteral(usize),
}

/// Lower and numeric charsets plus a run shape drawn from them
#[derive(Debug, Clone)]
struct Case {
    lower: Vec<char>,
    digits: Vec<char>,
    pattern: Option<String>,
    /// Characters each position can take
    sets: Vec<Vec<char>>,
    min: usize,
    max: usize,
    start: Option<String>,
    end: Option<String>,
    order: Order,
}

impl Case {
    fn options(&self) -> GenOptions {
        let mut opts = GenOptions::new(self.min, self.max)
            .charset(CharsetKind::Lower, self.lower.iter().collect::<String>())
            .charset(CharsetKind::Numeric, self.digits.iter().collect::<String>());
        if let Some(ref pattern) = self.pattern {
            opts = opts.pattern(pattern.clone());
        }
        opts.start = self.start.clone();
        opts.end = self.end.clone();
        opts.order = self.order;
        opts
    }

    fn indices(&self, s: &str) -> Vec<usize> {
        position_indices(&self.sets, s)
    }
}

fn position_indices(sets: &[Vec<char>], s: &str) -> Vec<usize> {
    s.chars()
        .enumerate()
        .map(|(i, c)| sets[i].iter().position(|&x| x == c).unwrap())
        .collect()
}

fn pick(sets: &[Vec<char>], raw: &[usize], len: usize) -> String {
    (0..len).map(|i| sets[i][raw[i] % sets[i].len()]).collect()
}

fn cell_strategy() -> impl Strategy<Value = Cell> {
    prop_oneof![
        Just(Cell::Lower),
        Just(Cell::Digit),
        (0usize..5).prop_map(Cell::LowerLiteral),
        (0usize..4).prop_map(Cell::DigitLiteral),
    ]
}

fn case_strategy() -> impl Strategy<Value = Case> {
    (
        prop::sample::subsequence(vec!['a', 'b', 'c', 'd', 'e'], 1..=4),
        prop::sample::subsequence(vec!['0', '1', '2', '3'], 1..=3),
        prop::option::of(prop::collection::vec(cell_strategy(), 1..=3)),
        0usize..=2,
        0usize..=2,
        prop::collection::vec(0usize..5, MAX_LEN),
        prop::collection::vec(0usize..5, MAX_LEN),
        (any::<bool>(), any::<bool>()),
        any::<bool>(),
    )
        .prop_map(
            |(lower, digits, cells, min, extra, raw_start, raw_end, (use_start, use_end), inverted)| {
                let (pattern, sets, min, max) = match cells {
                    Some(cells) => {
                        let mut pattern = String::new();
                        let mut sets = Vec::new();
                        for cell in &cells {
                            let (marker, set) = match *cell {
                                Cell::Lower => ('@', lower.clone()),
                                Cell::Digit => ('%', digits.clone()),
                                Cell::LowerLiteral(i) => {
                                    let c = lower[i % lower.len()];
                                    (c, vec![c])
                                }
                                Cell::DigitLiteral(i) => {
                                    let c = digits[i % digits.len()];
                                    (c, vec![c])
                                }
                            };
                            pattern.push(marker);
                            sets.push(set);
                        }
                        (Some(pattern), sets, cells.len(), cells.len())
                    }
                    None => (None, vec![lower.clone(); min + extra], min, min + extra),
                };

                let order = if inverted { Order::Inverted } else { Order::Forward };
                let mut start = use_start.then(|| pick(&sets, &raw_start, min));
                let mut end = use_end.then(|| pick(&sets, &raw_end, max));

                if let (Some(s), Some(e)) = (&start, &end) {
                    if min == max
                        && order.compare(&position_indices(&sets, s), &position_indices(&sets, e))
                            == Ordering::Greater
                    {
                        std::mem::swap(&mut start, &mut end);
                    }
                }

                Case {
                    lower,
                    digits,
                    pattern,
                    sets,
                    min,
                    max,
                    start,
                    end,
                    order,
                }
            },
        )
}

fn generate(opts: &GenOptions) -> Vec<String> {
    let config = RunConfig::configure(opts).unwrap();
    enumerate(&config, None).unwrap().collect()
}

proptest! {
    #[test]
    fn sequence_spans_boundaries(case in case_strategy()) {
        let config = RunConfig::configure(&case.options()).unwrap();
        let out: Vec<String> = enumerate(&config, None).unwrap().collect();
        let bounds = config.boundaries();

        prop_assert!(!out.is_empty());
        prop_assert_eq!(out.first().unwrap(), &bounds.min_string.iter().collect::<String>());
        prop_assert_eq!(out.last().unwrap(), &bounds.max_string.iter().collect::<String>());
        prop_assert_eq!(estimate(&config).lines, out.len() as u128);
    }

    #[test]
    fn sequence_is_strictly_ordered(case in case_strategy()) {
        let out = generate(&case.options());

        for pair in out.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (la, lb) = (a.chars().count(), b.chars().count());
            prop_assert!(la <= lb, "{:?} before {:?}", a, b);
            if la == lb {
                prop_assert_eq!(
                    case.order.compare(&case.indices(a), &case.indices(b)),
                    Ordering::Less,
                    "{:?} before {:?}", a, b
                );
            }
        }
    }

    #[test]
    fn resume_continues_with_remaining_suffix(case in case_strategy(), cut in any::<prop::sample::Index>()) {
        let opts = case.options();
        let config = RunConfig::configure(&opts).unwrap();
        let full: Vec<String> = enumerate(&config, None).unwrap().collect();

        let n = cut.index(full.len());
        let rest: Vec<String> = enumerate(&config, Some(&full[n])).unwrap().collect();
        prop_assert_eq!(rest, full[n + 1..].to_vec());
    }

    #[test]
    fn duplicate_filter_matches_post_filtering(
        case in case_strategy(),
        limit in 0usize..3,
    ) {
        // explicit boundaries must satisfy the limit, so only free runs are checked here
        let mut case = case;
        case.start = None;
        case.end = None;

        let plain = case.options();
        let limits = DuplicateLimits::unlimited().with(CharsetKind::Lower, limit);
        let filtered_opts = plain.clone().duplicates(limits);

        let config = RunConfig::configure(&filtered_opts).unwrap();
        let filtered = generate(&filtered_opts);
        let expected: Vec<String> = generate(&plain)
            .into_iter()
            .filter(|w| !exceeds_limit(w.chars(), &limits, config.charsets()))
            .collect();

        prop_assert_eq!(filtered, expected);
    }

    #[test]
    fn generation_is_repeatable(case in case_strategy()) {
        let opts = case.options();
        prop_assert_eq!(generate(&opts), generate(&opts));
    }
}

#[test]
fn pattern_with_literal_positions() {
    let out = generate(&GenOptions::new(4, 4).pattern("x@%y").charset(CharsetKind::Lower, "xy"));
    assert_eq!(out.len(), 2 * 10);
    assert_eq!(out[0], "xx0y");
    assert_eq!(out[1], "xx1y");
    assert_eq!(out.last().unwrap(), "xy9y");
}

#[test]
fn computed_boundary_can_be_filtered() {
    let opts = GenOptions::new(3, 3)
        .charset(CharsetKind::Lower, "ab")
        .duplicates(DuplicateLimits::unlimited().with(CharsetKind::Lower, 1));
    assert_eq!(generate(&opts), vec!["aba", "bab"]);
}

#[test]
fn explicit_boundary_violating_limit_is_rejected() {
    let opts = GenOptions::new(3, 3)
        .charset(CharsetKind::Lower, "ab")
        .duplicates(DuplicateLimits::unlimited().with(CharsetKind::Lower, 1))
        .start("aab");
    assert!(RunConfig::configure(&opts).is_err());
}
