//! Deterministic stand-in for the live comments endpoint.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::RawComment;

/// Number of posts the live API spreads its comments over.
const POSTS: i64 = 100;

const WORDS: &[&str] = &[
    "laudantium", "enim", "quasi", "est", "quidem", "magnam", "voluptate", "ipsam", "eos",
    "tempora", "quo", "necessitatibus", "dolor", "quam", "autem", "reiciendis", "et", "nam",
    "sapiente", "accusantium", "natus", "nihil", "omnis", "numquam", "occaecati", "ullam", "at",
    "error", "expedita", "pariatur", "sint", "nostrum", "molestiae", "aut", "eveniet", "saepe",
    "maiores", "non", "atque", "deserunt", "odit", "nobis", "qui", "rerum", "ut", "harum",
];

const USERS: &[(&str, &str)] = &[
    ("Eliseo", "gardner.biz"),
    ("Jayne_Kuhic", "sydney.com"),
    ("Nikita", "garfield.biz"),
    ("Lew", "alysha.tv"),
    ("Hayden", "althea.biz"),
    ("Presley.Mueller", "myrl.com"),
    ("Dallas", "ole.me"),
    ("Mallory_Kunze", "marie.org"),
    ("Meghan_Littel", "rosamond.me"),
    ("Carmen_Keeling", "caroline.name"),
];

/// Shortest and longest generated body, in words. The range spans every
/// length category.
const MIN_WORDS: usize = 2;
const MAX_WORDS: usize = 45;

/// Generates `count` comments shaped like the live payload.
///
/// The same `seed` always yields the same records. Ids run from 1 to `count`.
pub fn generate(count: usize, seed: u64) -> Vec<RawComment> {
    let mut rng = StdRng::seed_from_u64(seed);

    (1..=count as i64)
        .map(|id| {
            let &(user, domain) = USERS.choose(&mut rng).unwrap_or(&USERS[0]);
            let name = sentence(&mut rng, 3);
            let words = rng.gen_range(MIN_WORDS..=MAX_WORDS);

            RawComment {
                post_id: Some(rng.gen_range(1..=POSTS)),
                id: Some(id),
                name: Some(name),
                email: Some(format!("{user}@{domain}")),
                body: Some(sentence(&mut rng, words)),
            }
        })
        .collect()
}

fn sentence(rng: &mut StdRng, words: usize) -> String {
    (0..words)
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}
