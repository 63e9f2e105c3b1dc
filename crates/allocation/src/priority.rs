use cosmwasm_std::Addr;
use meta_vault_adapter::try_exit_cost;
use meta_vault_types::TargetHost;

/// Direction of a cost ordering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    /// Cheapest first; the drain order for withdrawals
    Ascending,
    Descending,
}

impl SortOrder {
    fn out_of_order(self, previous: u64, current: u64) -> bool {
        match self {
            SortOrder::Ascending => previous > current,
            SortOrder::Descending => previous < current,
        }
    }
}

/// Stable insertion sort of `(item, cost)` pairs.
///
/// Equal costs keep their input order in both directions. Quadratic, which is
/// fine for the handful of governance-approved targets a vault carries.
pub fn insertion_sort_by_cost<T>(items: &mut [(T, u64)], order: SortOrder) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && order.out_of_order(items[j - 1].1, items[j].1) {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Order `targets` by the exit cost each one reports.
///
/// Targets without the async extension, or whose query fails, rank as cost 0.
pub fn sort_by_exit_cost<H: TargetHost + ?Sized>(
    host: &H,
    targets: &[Addr],
    order: SortOrder,
) -> Vec<Addr> {
    let mut keyed: Vec<(Addr, u64)> = targets
        .iter()
        .map(|t| (t.clone(), try_exit_cost(host, t)))
        .collect();
    insertion_sort_by_cost(&mut keyed, order);
    keyed.into_iter().map(|(t, _)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[(&'static str, u64)]) -> Vec<&'static str> {
        items.iter().map(|(label, _)| *label).collect()
    }

    #[test]
    fn test_ascending_orders_cheapest_first() {
        let mut items = vec![("c", 300), ("a", 100), ("b", 200)];
        insertion_sort_by_cost(&mut items, SortOrder::Ascending);
        assert_eq!(labels(&items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_descending_orders_most_expensive_first() {
        let mut items = vec![("a", 100), ("c", 300), ("b", 200)];
        insertion_sort_by_cost(&mut items, SortOrder::Descending);
        assert_eq!(labels(&items), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order_both_ways() {
        let input = vec![("x", 50), ("p", 10), ("y", 50), ("q", 10), ("z", 50)];

        let mut asc = input.clone();
        insertion_sort_by_cost(&mut asc, SortOrder::Ascending);
        assert_eq!(labels(&asc), vec!["p", "q", "x", "y", "z"]);

        let mut desc = input;
        insertion_sort_by_cost(&mut desc, SortOrder::Descending);
        assert_eq!(labels(&desc), vec!["x", "y", "z", "p", "q"]);
    }

    #[test]
    fn test_empty_and_single() {
        let mut empty: Vec<(&str, u64)> = vec![];
        insertion_sort_by_cost(&mut empty, SortOrder::Ascending);
        assert!(empty.is_empty());

        let mut one = vec![("only", 7)];
        insertion_sort_by_cost(&mut one, SortOrder::Descending);
        assert_eq!(labels(&one), vec!["only"]);
    }
}
