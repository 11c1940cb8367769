//! Bottom-up traversal over ternary trees without recursion.
//!
//! Trie depth grows with word length, so anything that visits a whole tree
//! keeps its own stack instead of using the call stack.

enum Visit<'a, S> {
    Enter(&'a S),
    Exit(&'a S),
}

/// Builds one value per node, children before parents. `children` lists a
/// node's `(low, mid, high)` children and `build` receives the values
/// already built for them; returning `None` drops the subtree.
pub(crate) fn fold<'a, S, T>(
    root: &'a S,
    children: impl Fn(&'a S) -> [Option<&'a S>; 3],
    mut build: impl FnMut(&'a S, [Option<T>; 3]) -> Option<T>,
) -> Option<T> {
    let mut stack = vec![Visit::Enter(root)];
    let mut built: Vec<Option<T>> = Vec::new();
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(node) => {
                stack.push(Visit::Exit(node));
                // entered low, mid, high so they finish high, mid, low
                stack.extend(children(node).into_iter().flatten().map(Visit::Enter));
            }
            Visit::Exit(node) => {
                let mut slots: [Option<T>; 3] = [None, None, None];
                for (slot, child) in slots.iter_mut().zip(children(node)) {
                    if child.is_some() {
                        *slot = built.pop().flatten();
                    }
                }
                built.push(build(node, slots));
            }
        }
    }
    built.pop().flatten()
}
