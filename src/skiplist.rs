use std::borrow::Borrow;
use std::fmt;

use log::{debug, trace};

use crate::height_control::{GeometricalGenerator, HeightControl, MAX_HEIGHT};
use crate::node::{Link, Node, NodeId, Position, Tower};

/// One entry of a predecessor path: the last node on a level whose element
/// precedes the searched key, and its distance from the head in level-0 steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    pub position: Position,
    pub rank: usize,
}

/// Result of `SkipList::locate`. It is only valid until the list is next
/// modified, so it is always consumed by the operation that asked for it.
#[derive(Debug, Clone)]
pub(crate) struct Path {
    steps: Vec<Step>,
}

impl Path {
    #[inline]
    pub fn position(&self, level: usize) -> Position {
        self.steps[level].position
    }

    #[inline]
    pub fn rank(&self, level: usize) -> usize {
        self.steps[level].rank
    }
}

/// An ordered set that also answers "which element has rank n" in
/// logarithmic expected time.
///
/// Every forward link carries the number of level-0 steps it skips over, so
/// rank queries can descend the levels the same way key searches do.
pub struct SkipList<T> {
    /// Node storage. Links refer to nodes by their index in here; slots of
    /// removed nodes are `None` until reused through `free_`.
    nodes_: Vec<Option<Node<T>>>,
    free_: Vec<NodeId>,

    /// Links out of the head sentinel. It always has `max_height_` levels, and
    /// levels above `height_` point straight at the tail.
    head_: Tower,

    /// Node whose level-0 link reaches the tail, if any.
    last_: Option<NodeId>,

    /// Number of elements in the SkipList
    length_: usize,

    /// Number of levels currently used by at least one node.
    height_: usize,

    /// Maximum height the `controller_` can generate. Cached here so that the
    /// per-level loops don't go through dynamic dispatch.
    max_height_: usize,

    /// Used to generate the height for any given node when inserting data.
    controller_: Box<dyn HeightControl<T>>,
}

impl<T> SkipList<T> {
    pub fn new(controller: Box<dyn HeightControl<T>>) -> SkipList<T> {
        let max_height = controller.max_height();
        assert!(max_height > 0);
        assert!(max_height <= MAX_HEIGHT);

        SkipList {
            nodes_: Vec::new(),
            free_: Vec::new(),
            head_: Tower::new(max_height),
            last_: None,
            length_: 0,
            height_: 0,
            max_height_: max_height,
            controller_: controller,
        }
    }

    /// Builds a list whose structure is reproducible: the same sequence of
    /// operations on lists with the same seed produces the same towers.
    pub fn with_seed(seed: u64) -> SkipList<T> {
        Self::new(Box::new(GeometricalGenerator::seeded(MAX_HEIGHT, 0.5, seed)))
    }

    /// Returns the number of elements stored in the structure.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.length_
    }

    /// Returns `true` if there are no elements stored within the structure.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.length_ == 0
    }

    /// Number of levels currently in use.
    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height_
    }

    /// Returns the maximum reachable height of the SkipList.
    #[inline(always)]
    pub fn max_height(&self) -> usize {
        self.max_height_
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        debug!("clearing skip list with {} elements", self.length_);
        self.nodes_.clear();
        self.free_.clear();
        self.head_ = Tower::new(self.max_height_);
        self.last_ = None;
        self.length_ = 0;
        self.height_ = 0;
    }

    pub fn first(&self) -> Option<&T> {
        self.element_at(self.head_.next(0))
    }

    pub fn last(&self) -> Option<&T> {
        self.last_.map(|id| self.node(id).element())
    }

    /// Returns the element with 0-based rank `n`, i.e. the `n`-th smallest one.
    pub fn get_by_rank(&self, n: usize) -> Option<&T> {
        if n >= self.length_ {
            return None;
        }

        // Stop on the node with rank `n` (the head has rank 0); the answer is
        // right after it.
        let mut current = Position::Head;
        let mut span = 0;
        for level in (0..self.height_).rev() {
            loop {
                let tower = self.tower(current);
                match tower.next(level) {
                    Link::Node(id) if span + tower.width(level) <= n => {
                        span += tower.width(level);
                        current = Position::Node(id);
                    }
                    _ => break,
                }
            }
        }

        self.element_at(self.tower(current).next(0))
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        match self.nodes_[id] {
            Some(ref node) => node,
            None => unreachable!("node {} is linked but was released", id),
        }
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.nodes_[id] {
            Some(ref mut node) => node,
            None => unreachable!("node {} is linked but was released", id),
        }
    }

    #[inline]
    fn tower(&self, position: Position) -> &Tower {
        match position {
            Position::Head => &self.head_,
            Position::Node(id) => &self.node(id).tower,
        }
    }

    #[inline]
    fn tower_mut(&mut self, position: Position) -> &mut Tower {
        match position {
            Position::Head => &mut self.head_,
            Position::Node(id) => &mut self.node_mut(id).tower,
        }
    }

    #[inline]
    pub(crate) fn first_link(&self) -> Link {
        self.head_.next(0)
    }

    fn element_at(&self, link: Link) -> Option<&T> {
        link.node().map(|id| self.node(id).element())
    }

    fn allocate(&mut self, element: T, height: usize) -> NodeId {
        let node = Node::new(element, height);
        match self.free_.pop() {
            Some(id) => {
                self.nodes_[id] = Some(node);
                id
            }
            None => {
                self.nodes_.push(Some(node));
                self.nodes_.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node<T> {
        match self.nodes_[id].take() {
            Some(node) => {
                self.free_.push(id);
                node
            }
            None => unreachable!("node {} released twice", id),
        }
    }

    /// Node ids in level-0 order.
    fn ordered_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.length_);
        let mut link = self.head_.next(0);
        while let Link::Node(id) = link {
            ids.push(id);
            link = self.node(id).tower.next(0);
        }
        ids
    }

    /// Moves every element out, in ascending order.
    pub(crate) fn into_elements(mut self) -> Vec<T> {
        self.ordered_ids()
            .into_iter()
            .map(|id| self.release(id).into_element())
            .collect()
    }

    /// Links node `id`, whose tower is already sized, right after the level-0
    /// predecessor in `path`.
    fn splice(&mut self, id: NodeId, path: &Path) {
        let height = self.node(id).height();
        self.height_ = std::cmp::max(self.height_, height);

        let base_rank = path.rank(0);
        for level in 0..self.max_height_ {
            let predecessor = path.position(level);

            if level < height {
                let (old_next, old_width) = {
                    let tower = self.tower(predecessor);
                    (tower.next(level), tower.width(level))
                };

                // Level-0 steps between the predecessor on this level and the
                // new node's immediate predecessor.
                let covered = base_rank - path.rank(level);
                debug_assert!(old_width > covered);

                self.node_mut(id).tower.link(level, old_next, old_width - covered);
                self.tower_mut(predecessor)
                    .link(level, Link::Node(id), covered + 1);
            } else {
                // The new node falls inside this span without ending it.
                let tower = self.tower_mut(predecessor);
                let width = tower.width(level);
                tower.set_width(level, width + 1);
            }
        }

        let back = path.position(0).node();
        self.node_mut(id).back = back;
        match self.node(id).tower.next(0) {
            Link::Node(next) => self.node_mut(next).back = Some(id),
            Link::Tail => self.last_ = Some(id),
        }

        self.length_ += 1;
    }

    /// Detaches node `id` from every level. `path` must come from locating
    /// the node's own element.
    fn unlink(&mut self, id: NodeId, path: &Path) {
        for level in 0..self.max_height_ {
            let predecessor = path.position(level);
            let (next, width) = {
                let tower = self.tower(predecessor);
                (tower.next(level), tower.width(level))
            };

            if next == Link::Node(id) {
                let (skipped_next, skipped_width) = {
                    let tower = &self.node(id).tower;
                    (tower.next(level), tower.width(level))
                };
                self.tower_mut(predecessor)
                    .link(level, skipped_next, width + skipped_width - 1);
            } else {
                debug_assert!(width > 1);
                self.tower_mut(predecessor).set_width(level, width - 1);
            }
        }

        let back = self.node(id).back;
        match self.node(id).tower.next(0) {
            Link::Node(next) => self.node_mut(next).back = back,
            Link::Tail => self.last_ = back,
        }

        while self.height_ > 0 && self.head_.next(self.height_ - 1) == Link::Tail {
            self.height_ -= 1;
        }

        self.length_ -= 1;
    }

    /// Checks every structural invariant, panicking with a description of the
    /// first violation found.
    #[doc(hidden)]
    pub fn check_invariants(&self)
    where
        T: Ord,
    {
        let ordered = self.ordered_ids();
        assert_eq!(ordered.len(), self.length_, "level-0 chain length != len()");

        let live = self.nodes_.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(live, self.length_, "live arena slots != len()");
        for &id in &self.free_ {
            assert!(self.nodes_[id].is_none(), "free slot {} is occupied", id);
        }

        // Rank of every node, the head being rank 0 and the tail len() + 1.
        let mut ranks = vec![0; self.nodes_.len()];
        for (index, &id) in ordered.iter().enumerate() {
            ranks[id] = index + 1;
            let expected_back = if index == 0 { None } else { Some(ordered[index - 1]) };
            assert_eq!(self.node(id).back, expected_back, "bad back link on node {}", id);
        }
        let rank_of = |link: Link| match link {
            Link::Node(id) => ranks[id],
            Link::Tail => self.length_ + 1,
        };

        assert_eq!(self.last_, ordered.last().cloned(), "bad last node");

        assert!(self.height_ <= self.max_height_);
        for level in 0..self.max_height_ {
            let mut position = Position::Head;
            let mut rank = 0;
            let mut visited = 0;
            let mut previous: Option<&T> = None;

            loop {
                let tower = self.tower(position);
                let next = tower.next(level);
                let width = tower.width(level);
                assert_eq!(
                    rank + width,
                    rank_of(next),
                    "width at level {} does not match the skipped steps",
                    level
                );
                rank += width;

                match next {
                    Link::Node(id) => {
                        let node = self.node(id);
                        assert!(node.height() > level, "node {} linked above its height", id);
                        if let Some(previous) = previous {
                            assert!(previous < node.element(), "level {} out of order", level);
                        }
                        previous = Some(node.element());
                        position = Position::Node(id);
                        visited += 1;
                    }
                    Link::Tail => break,
                }
            }

            let expected = ordered
                .iter()
                .filter(|&&id| self.node(id).height() > level)
                .count();
            assert_eq!(visited, expected, "level {} misses nodes", level);
            assert_eq!(rank, self.length_ + 1, "spans at level {} don't add up", level);
            assert_eq!(visited > 0, level < self.height_, "bad in-use height");
        }
    }
}

impl<T: Ord> SkipList<T> {
    /// Finds, for every level, the last node whose element is smaller than
    /// `key` together with its rank. Levels that are not in use yield the head.
    pub(crate) fn locate<Q>(&self, key: &Q) -> Path
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut steps = vec![
            Step {
                position: Position::Head,
                rank: 0,
            };
            self.max_height_
        ];

        let mut current = Position::Head;
        let mut rank = 0;
        for level in (0..self.height_).rev() {
            loop {
                let tower = self.tower(current);
                match tower.next(level) {
                    Link::Node(id) if self.node(id).element().borrow() < key => {
                        rank += tower.width(level);
                        current = Position::Node(id);
                    }
                    _ => break,
                }
            }

            steps[level] = Step {
                position: current,
                rank,
            };
        }

        Path { steps }
    }

    /// The node holding `key`, if the level-0 successor on `path` is one.
    fn matching<Q>(&self, path: &Path, key: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tower(path.position(0))
            .next(0)
            .node()
            .filter(|&id| self.node(id).element().borrow() == key)
    }

    // The controller may ask for anything, but the structure only grows one
    // level per insertion.
    fn choose_height(&mut self, element: &T) -> usize {
        let limit = std::cmp::min(self.height_ + 1, self.max_height_);
        let height = self.controller_.get_height(element);
        std::cmp::max(1, std::cmp::min(height, limit))
    }

    /// Inserts `element`. Returns false, leaving the list untouched, if an
    /// equal element is already present.
    pub fn insert(&mut self, element: T) -> bool {
        let path = self.locate(&element);
        if self.matching(&path, &element).is_some() {
            return false;
        }

        let height = self.choose_height(&element);
        let id = self.allocate(element, height);
        self.splice(id, &path);

        trace!("inserted at rank {} with height {}", path.rank(0), height);
        true
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let path = self.locate(key);
        self.matching(&path, key).is_some()
    }

    /// Returns a reference to the stored element equal to `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let path = self.locate(key);
        self.matching(&path, key).map(|id| self.node(id).element())
    }

    /// Removes the element equal to `key` and hands it back.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let path = self.locate(key);
        let id = self.matching(&path, key)?;
        Some(self.take(id, &path))
    }

    fn take(&mut self, id: NodeId, path: &Path) -> T {
        self.unlink(id, path);
        trace!("removed rank {}", path.rank(0));
        self.release(id).into_element()
    }

    pub fn pop_first(&mut self) -> Option<T> {
        let id = self.head_.next(0).node()?;
        let path = self.locate(self.node(id).element());
        Some(self.take(id, &path))
    }

    pub fn pop_last(&mut self) -> Option<T> {
        let id = self.last_?;
        let path = self.locate(self.node(id).element());
        Some(self.take(id, &path))
    }

    /// 0-based rank of the element equal to `key`.
    pub fn rank<Q>(&self, key: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let path = self.locate(key);
        self.matching(&path, key).map(|_| path.rank(0))
    }

    /// Greatest element less than or equal to `key`.
    pub fn floor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let path = self.locate(key);
        match self.matching(&path, key) {
            Some(id) => Some(self.node(id).element()),
            None => path.position(0).node().map(|id| self.node(id).element()),
        }
    }

    /// Least element greater than or equal to `key`.
    pub fn ceiling<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        // Whether or not `key` is present, the answer is the level-0 successor
        // of its predecessor.
        let path = self.locate(key);
        self.element_at(self.tower(path.position(0)).next(0))
    }

    /// Re-levels the whole list so that every level is an exact median split
    /// of the one below, which bounds search depth to `floor(log2(len)) + 1`
    /// levels until the next random insertions.
    pub fn rebuild(&mut self) {
        if self.length_ == 0 {
            return;
        }

        let ordered = self.ordered_ids();
        let top = ordered.len().ilog2() as usize;
        debug!(
            "rebuilding skip list with {} elements over {} levels",
            ordered.len(),
            std::cmp::min(top + 1, self.max_height_)
        );

        self.head_ = Tower::new(self.max_height_);
        self.last_ = None;
        self.length_ = 0;
        self.height_ = 0;

        // A perfect list over 2^(top + 1) - 1 slots; slots past the end of
        // `ordered` are skipped.
        let end = (1usize << (top + 1)) - 2;
        self.rebuild_range(&ordered, 0, end, top);
        debug_assert_eq!(self.length_, ordered.len());
    }

    fn rebuild_range(&mut self, ordered: &[NodeId], start: usize, end: usize, level: usize) {
        let mid = start + (end - start) / 2;
        let in_range = mid < ordered.len();

        if in_range {
            let id = ordered[mid];
            let height = std::cmp::min(level + 1, self.max_height_);
            let path = self.locate(self.node(id).element());
            self.node_mut(id).tower.reset(height);
            self.splice(id, &path);
        }

        if mid > start {
            self.rebuild_range(ordered, start, mid - 1, level - 1);
        }

        if in_range && mid < end {
            self.rebuild_range(ordered, mid + 1, end, level - 1);
        }
    }
}

impl<T: Ord> Default for SkipList<T> {
    fn default() -> Self {
        Self::new(Box::new(GeometricalGenerator::default()))
    }
}

impl<T: Ord> std::iter::FromIterator<T> for SkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = SkipList::default();
        list.extend(iter);
        list
    }
}

impl<T: Ord> Extend<T> for SkipList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<T: Ord + Clone> Clone for SkipList<T> {
    fn clone(&self) -> Self {
        let generator = GeometricalGenerator::new(self.max_height_, 0.5);
        let mut copied = SkipList::new(Box::new(generator));
        copied.extend(self.iter().cloned());
        copied.rebuild();
        copied
    }
}

impl<T: PartialEq> PartialEq for SkipList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SkipList<T> {}

impl<T: fmt::Display> fmt::Display for SkipList<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;

        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", element)?;
        }

        write!(f, "]")
    }
}

impl<T: fmt::Debug> fmt::Debug for SkipList<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> std::ops::Index<usize> for SkipList<T> {
    type Output = T;

    fn index(&self, rank: usize) -> &Self::Output {
        match self.get_by_rank(rank) {
            Some(element) => element,
            None => panic!("rank {} out of bounds for length {}", rank, self.length_),
        }
    }
}
