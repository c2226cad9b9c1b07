//! Length bookkeeping of task trees under arbitrary construction

use kubeforge_task::{FnTask, TaskGroup, TaskTree};
use proptest::prelude::*;

fn group_of(parallel: bool, size: usize) -> TaskGroup {
    let mut group = if parallel {
        TaskGroup::parallel("generated")
    } else {
        TaskGroup::sequential("generated")
    };
    for i in 0..size {
        group.push_task(FnTask::new(format!("task-{i}"), || async { Ok(()) }));
    }
    group
}

proptest! {
    #[test]
    fn length_is_sum_of_appended_leaves(
        root_size in 0usize..5,
        subtrees in prop::collection::vec((any::<bool>(), 0usize..6), 0..8),
    ) {
        let mut tree = TaskTree::new(group_of(false, root_size));
        let mut expected = root_size;
        for (parallel, size) in &subtrees {
            tree.append(group_of(*parallel, *size));
            expected += size;
        }

        prop_assert_eq!(tree.len(), expected);
        prop_assert_eq!(tree.root().leaf_count(), expected);
        prop_assert_eq!(tree.root().children().len(), root_size + subtrees.len());
        prop_assert_eq!(tree.is_empty(), expected == 0);
    }

    #[test]
    fn description_mentions_every_task(sizes in prop::collection::vec(1usize..4, 1..5)) {
        let mut tree = TaskTree::parallel("root");
        for size in &sizes {
            tree.append(group_of(false, *size));
        }

        let description = tree.describe();
        for size in &sizes {
            for i in 0..*size {
                let name = format!("task-{i}");
                prop_assert!(description.contains(&name));
            }
        }
    }
}
