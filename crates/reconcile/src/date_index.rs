use std::collections::HashMap;

use tally_core::{DateKey, Money, TransactionRecord};

/// Records of one ledger bucketed by date key.
///
/// Buckets keep the relative order of their records, and dates enumerate in
/// the order they were first seen, so two runs over the same input visit the
/// same dates in the same sequence.
#[derive(Debug, Clone, Default)]
pub struct DateIndex {
    order: Vec<DateKey>,
    groups: HashMap<DateKey, Vec<TransactionRecord>>,
}

impl DateIndex {
    pub fn build(records: &[TransactionRecord]) -> Self {
        let mut index = DateIndex::default();
        for record in records {
            index.push(record.clone());
        }
        index
    }

    fn push(&mut self, record: TransactionRecord) {
        match self.groups.get_mut(&record.date) {
            Some(group) => group.push(record),
            None => {
                self.order.push(record.date.clone());
                self.groups.insert(record.date.clone(), vec![record]);
            }
        }
    }

    pub fn get(&self, date: &DateKey) -> Option<&[TransactionRecord]> {
        self.groups.get(date).map(Vec::as_slice)
    }

    pub fn contains(&self, date: &DateKey) -> bool {
        self.groups.contains_key(date)
    }

    pub fn dates(&self) -> &[DateKey] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &[TransactionRecord])> {
        self.order
            .iter()
            .filter_map(|date| self.groups.get(date).map(|g| (date, g.as_slice())))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

pub fn total(records: &[TransactionRecord]) -> Money {
    records.iter().map(|r| r.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, amount: i64, issuer: &str) -> TransactionRecord {
        TransactionRecord::new(date, amount, issuer)
    }

    #[test]
    fn empty_input_yields_empty_index() {
        let index = DateIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.iter().count(), 0);
    }

    #[test]
    fn groups_by_date_preserving_order() {
        let records = vec![
            rec("d2", 10, "A"),
            rec("d1", 20, "B"),
            rec("d2", 30, "C"),
            rec("d1", 40, "D"),
        ];
        let index = DateIndex::build(&records);

        assert_eq!(index.dates(), &[DateKey::from("d2"), DateKey::from("d1")]);
        let d2: Vec<&str> = index
            .get(&"d2".into())
            .unwrap()
            .iter()
            .map(|r| r.issuer.as_str())
            .collect();
        assert_eq!(d2, vec!["A", "C"]);
        assert_eq!(index.get(&"d1".into()).unwrap().len(), 2);
    }

    #[test]
    fn missing_date_is_none() {
        let index = DateIndex::build(&[rec("d1", 1, "A")]);
        assert!(index.get(&"d9".into()).is_none());
        assert!(!index.contains(&"d9".into()));
        assert!(index.contains(&"d1".into()));
    }

    #[test]
    fn total_sums_amounts() {
        let records = vec![rec("d1", 100, "A"), rec("d1", -30, "B")];
        assert_eq!(total(&records), Money::from(70));
        assert_eq!(total(&[]), Money::zero());
    }
}
