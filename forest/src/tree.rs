//! CART classification tree.
//!
//! Nodes live in a flat arena; the root is always index 0. Splits route
//! `x[feature] <= threshold` to the left child.

use hostprint_types::ForestSettings;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::ForestError;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class probabilities, length `n_classes`, summing to 1.
        distribution: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTree {
    /// Fit on every row of `x`.
    pub fn fit<R: AsRef<[f64]>>(
        x: &[R],
        y: &[usize],
        n_classes: usize,
        settings: &ForestSettings,
        seed: u64,
    ) -> Result<Self, ForestError> {
        let n_features = validate_training_set(x, y, n_classes)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut samples: Vec<usize> = (0..x.len()).collect();
        Ok(Self::fit_samples(
            x,
            y,
            &mut samples,
            n_classes,
            n_features,
            settings,
            &mut rng,
        ))
    }

    /// Fit on the rows named by `samples` (may repeat). Inputs must already
    /// have passed [`validate_training_set`].
    pub(crate) fn fit_samples<R: AsRef<[f64]>>(
        x: &[R],
        y: &[usize],
        samples: &mut [usize],
        n_classes: usize,
        n_features: usize,
        settings: &ForestSettings,
        rng: &mut StdRng,
    ) -> Self {
        let mut builder = Builder {
            x,
            y,
            n_classes,
            n_features,
            max_features: settings.max_features().resolve(n_features),
            settings,
            rng,
            nodes: Vec::new(),
        };
        builder.build(samples);
        Self {
            nodes: builder.nodes,
            n_features,
        }
    }

    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, ForestError> {
        self.check_width(x)?;
        Ok(self.leaf_distribution(x).to_vec())
    }

    pub fn predict(&self, x: &[f64]) -> Result<usize, ForestError> {
        self.check_width(x)?;
        Ok(argmax(self.leaf_distribution(x)).0)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf edge count.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match &self.nodes[id] {
                Node::Split { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
                Node::Leaf { .. } => deepest = deepest.max(depth),
            }
        }
        deepest
    }

    pub(crate) fn check_width(&self, x: &[f64]) -> Result<(), ForestError> {
        if x.len() == self.n_features {
            Ok(())
        } else {
            Err(ForestError::WidthMismatch {
                expected: self.n_features,
                found: x.len(),
            })
        }
    }

    pub(crate) fn leaf_distribution(&self, x: &[f64]) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if x[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Leaf { distribution } => return distribution,
            }
        }
    }
}

/// Index and value of the largest entry; the lowest index wins ties.
pub(crate) fn argmax(values: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, &v) in values.iter().enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}

/// Check shapes and label range; returns the feature count.
pub(crate) fn validate_training_set<R: AsRef<[f64]>>(
    x: &[R],
    y: &[usize],
    n_classes: usize,
) -> Result<usize, ForestError> {
    if n_classes == 0 {
        return Err(ForestError::NoClasses);
    }
    if x.len() != y.len() {
        return Err(ForestError::LengthMismatch {
            rows: x.len(),
            labels: y.len(),
        });
    }
    let Some(first) = x.first() else {
        return Err(ForestError::NoSamples);
    };
    let n_features = first.as_ref().len();
    if n_features == 0 {
        return Err(ForestError::NoFeatures);
    }
    for (row, sample) in x.iter().enumerate() {
        let found = sample.as_ref().len();
        if found != n_features {
            return Err(ForestError::RaggedRow {
                row,
                expected: n_features,
                found,
            });
        }
    }
    if let Some(&label) = y.iter().find(|&&label| label >= n_classes) {
        return Err(ForestError::LabelOutOfRange { label, n_classes });
    }
    Ok(n_features)
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// Weighted child impurity; lower is better.
    score: f64,
}

#[derive(Debug, Clone, Copy)]
enum Child {
    Left,
    Right,
}

/// A node waiting to be grown: its slice of the sample buffer and where to
/// link it once it has an id.
#[derive(Debug)]
struct Pending {
    start: usize,
    end: usize,
    depth: usize,
    parent: Option<(usize, Child)>,
}

struct Builder<'a, R> {
    x: &'a [R],
    y: &'a [usize],
    n_classes: usize,
    n_features: usize,
    max_features: usize,
    settings: &'a ForestSettings,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
}

impl<R: AsRef<[f64]>> Builder<'_, R> {
    fn value(&self, sample: usize, feature: usize) -> f64 {
        self.x[sample].as_ref()[feature]
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &i in samples {
            counts[self.y[i]] += 1;
        }
        counts
    }

    /// Grow the tree depth-first from an explicit work stack, so depth is
    /// bounded by memory rather than by the thread's stack.
    ///
    /// Left children are popped before right ones, which keeps node ids in
    /// pre-order and the RNG draw order stable.
    fn build(&mut self, samples: &mut [usize]) {
        let mut pending = vec![Pending {
            start: 0,
            end: samples.len(),
            depth: 0,
            parent: None,
        }];

        while let Some(task) = pending.pop() {
            let node_samples = &mut samples[task.start..task.end];
            let counts = self.class_counts(node_samples);
            let id = self.nodes.len();

            if let Some((split, mid)) = self.partition(node_samples, &counts, task.depth) {
                self.nodes.push(Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left: id,
                    right: id,
                });
                let middle = task.start + mid;
                pending.push(Pending {
                    start: middle,
                    end: task.end,
                    depth: task.depth + 1,
                    parent: Some((id, Child::Right)),
                });
                pending.push(Pending {
                    start: task.start,
                    end: middle,
                    depth: task.depth + 1,
                    parent: Some((id, Child::Left)),
                });
            } else {
                let total = node_samples.len().max(1) as f64;
                self.nodes.push(Node::Leaf {
                    distribution: counts.iter().map(|&c| c as f64 / total).collect(),
                });
            }
            self.attach(task.parent, id);
        }
    }

    /// Find a split for this node and reorder `samples` so the left side
    /// comes first; returns the split and the left side's length.
    fn partition(
        &mut self,
        samples: &mut [usize],
        counts: &[usize],
        depth: usize,
    ) -> Option<(SplitCandidate, usize)> {
        let n = samples.len();
        let splittable = n >= self.settings.min_samples_split()
            && n >= 2 * self.settings.min_samples_leaf()
            && self.settings.depth().allows_split_at(depth)
            && gini(counts, n) > f64::EPSILON;
        if !splittable {
            return None;
        }

        let split = self.best_split(samples, counts)?;
        let mut mid = 0;
        for j in 0..n {
            if self.value(samples[j], split.feature) <= split.threshold {
                samples.swap(mid, j);
                mid += 1;
            }
        }
        Some((split, mid))
    }

    fn attach(&mut self, parent: Option<(usize, Child)>, id: usize) {
        let Some((parent, side)) = parent else {
            return;
        };
        if let Node::Split { left, right, .. } = &mut self.nodes[parent] {
            match side {
                Child::Left => *left = id,
                Child::Right => *right = id,
            }
        }
    }

    /// Search candidate features in random order. At least `max_features`
    /// are inspected; the search keeps going past that only while no valid
    /// partition has been found.
    fn best_split(&mut self, samples: &[usize], parent: &[usize]) -> Option<SplitCandidate> {
        let n = samples.len();
        let min_leaf = self.settings.min_samples_leaf();
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(&mut *self.rng);

        let mut best: Option<SplitCandidate> = None;
        let mut ordered: Vec<(f64, usize)> = Vec::with_capacity(n);
        let mut left = vec![0usize; self.n_classes];
        let mut right = vec![0usize; self.n_classes];

        for (visited, &feature) in features.iter().enumerate() {
            if visited >= self.max_features && best.is_some() {
                break;
            }

            ordered.clear();
            ordered.extend(samples.iter().map(|&i| (self.value(i, feature), self.y[i])));
            ordered.sort_by(|a, b| a.0.total_cmp(&b.0));
            left.fill(0);

            for i in 0..n - 1 {
                left[ordered[i].1] += 1;
                let (here, next) = (ordered[i].0, ordered[i + 1].0);
                if next <= here {
                    continue;
                }
                let n_left = i + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }
                for (r, (&p, &l)) in right.iter_mut().zip(parent.iter().zip(left.iter())) {
                    *r = p - l;
                }
                let score = (n_left as f64 * gini(&left, n_left)
                    + n_right as f64 * gini(&right, n_right))
                    / n as f64;
                if best.is_none_or(|b| score < b.score) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(here, next),
                        score,
                    });
                }
            }
        }
        best
    }
}

/// Threshold strictly below `hi` so that `lo` routes left and `hi` right.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo / 2.0 + hi / 2.0;
    if mid >= hi { lo } else { mid }
}
