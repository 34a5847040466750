//! Peer address ordering
//!
//! Master election is deterministic: every node that runs it over the same
//! peer set picks the same winner, without any coordination round.

use crate::data::PeerId;

/// Return the least peer under the transport's stable total order
///
/// # Panics
///
/// Panics if `peers` is empty. Callers always include at least the local
/// peer.
pub fn choose_first<I>(peers: I) -> PeerId
where
    I: IntoIterator<Item = PeerId>,
{
    peers
        .into_iter()
        .min()
        .expect("choose_first over an empty peer set")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(seed: u8) -> PeerId {
        PeerId::new([seed; 32])
    }

    #[test]
    fn test_picks_the_least_peer() {
        let peers = vec![peer(3), peer(1), peer(2)];
        assert_eq!(choose_first(peers), peer(1));
    }

    #[test]
    fn test_single_peer() {
        assert_eq!(choose_first(vec![peer(9)]), peer(9));
    }

    #[test]
    fn test_deterministic_across_orderings() {
        let a = choose_first(vec![peer(5), peer(2), peer(8)]);
        let b = choose_first(vec![peer(8), peer(5), peer(2)]);
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic]
    fn test_empty_input_panics() {
        choose_first(Vec::new());
    }
}
