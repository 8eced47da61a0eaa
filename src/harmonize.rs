use hashbrown::HashMap;

/// Collapse each trip's expanded per-passenger raw labels down to a single
/// label per trip.
///
/// `raw_labels` holds one label per expanded row, in trip order;
/// `passenger_counts` says how many consecutive copies belong to each trip.
/// Copies of one trip can disagree when points coincide or sit near a window
/// edge, so the noise copies are ignored and the most frequent non-negative
/// label wins. Frequency ties resolve to the smallest label value; a trip
/// whose copies are all noise stays at -1.
pub fn harmonize_labels(raw_labels: &[i32], passenger_counts: &[u32]) -> Vec<i32> {
    debug_assert_eq!(
        raw_labels.len(),
        passenger_counts.iter().map(|&count| count as usize).sum::<usize>()
    );

    let mut labels = Vec::with_capacity(passenger_counts.len());
    let mut offset = 0;
    for &count in passenger_counts {
        let copies = &raw_labels[offset..offset + count as usize];
        labels.push(trip_label(copies));
        offset += count as usize;
    }
    labels
}

/// Mode over the non-noise copies, pinned to smallest-label-wins on ties so
/// the result is deterministic.
fn trip_label(copies: &[i32]) -> i32 {
    let mut frequencies: HashMap<i32, usize> = HashMap::new();
    for &label in copies {
        if label > -1 {
            *frequencies.entry(label).or_insert(0) += 1;
        }
    }

    frequencies
        .into_iter()
        .max_by(|(label_a, count_a), (label_b, count_b)| {
            count_a.cmp(count_b).then(label_b.cmp(label_a))
        })
        .map(|(label, _)| label)
        .unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_label_wins() {
        assert_eq!(harmonize_labels(&[2, 2, 5], &[3]), vec![2]);
    }

    #[test]
    fn noise_copies_are_ignored() {
        assert_eq!(harmonize_labels(&[-1, -1, 3], &[3]), vec![3]);
    }

    #[test]
    fn all_noise_stays_unclustered() {
        assert_eq!(harmonize_labels(&[-1, -1, -1], &[3]), vec![-1]);
    }

    #[test]
    fn frequency_ties_resolve_to_the_smallest_label() {
        assert_eq!(harmonize_labels(&[7, 1, 7, 1], &[4]), vec![1]);
        assert_eq!(harmonize_labels(&[1, 7, -1, 7, 1], &[5]), vec![1]);
    }

    #[test]
    fn trips_are_collapsed_independently() {
        let raw = [0, 0, 0, -1, 4, 4, -1];
        let counts = [3, 1, 2, 1];
        assert_eq!(harmonize_labels(&raw, &counts), vec![0, -1, 4, -1]);
    }

    #[test]
    fn empty_input_yields_no_labels() {
        assert_eq!(harmonize_labels(&[], &[]), Vec::<i32>::new());
    }
}
