/// Index of a node inside the list's arena.
pub(crate) type NodeId = usize;

/// Target of a forward link. The tail sentinel carries no payload, so it is
/// not a node at all: every chain simply ends in `Link::Tail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    Node(NodeId),
    Tail,
}

impl Link {
    #[inline]
    pub fn node(self) -> Option<NodeId> {
        match self {
            Link::Node(id) => Some(id),
            Link::Tail => None,
        }
    }
}

/// Owner of a tower: either the head sentinel or a real node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position {
    Head,
    Node(NodeId),
}

impl Position {
    #[inline]
    pub fn node(self) -> Option<NodeId> {
        match self {
            Position::Head => None,
            Position::Node(id) => Some(id),
        }
    }
}

impl From<NodeId> for Position {
    fn from(id: NodeId) -> Position {
        Position::Node(id)
    }
}

/// The per-level links of a node. `width[i]` is the number of level-0 steps
/// that `forward[i]` covers, so a node directly followed by its level-0
/// successor always has `width[0] == 1`.
#[derive(Debug, Clone)]
pub(crate) struct Tower {
    forward: Vec<Link>,
    width: Vec<usize>,
}

impl Tower {
    // A tower of height h takes part in levels 0..h. Fresh towers point
    // straight at the tail with a span of one step.
    pub fn new(height: usize) -> Tower {
        debug_assert!(height > 0);
        Tower {
            forward: vec![Link::Tail; height],
            width: vec![1; height],
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.forward.len()
    }

    #[inline]
    pub fn next(&self, level: usize) -> Link {
        self.forward[level]
    }

    #[inline]
    pub fn width(&self, level: usize) -> usize {
        self.width[level]
    }

    pub fn link(&mut self, level: usize, target: Link, width: usize) {
        debug_assert!(level < self.height());
        debug_assert!(width > 0);
        self.forward[level] = target;
        self.width[level] = width;
    }

    #[inline]
    pub fn set_width(&mut self, level: usize, width: usize) {
        self.width[level] = width;
    }

    /// Drops every link and resizes the tower to `height` levels.
    pub fn reset(&mut self, height: usize) {
        debug_assert!(height > 0);
        self.forward.clear();
        self.forward.resize(height, Link::Tail);
        self.width.clear();
        self.width.resize(height, 1);
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    element: T,
    pub tower: Tower,
    /// Level-0 predecessor; `None` for the first node.
    pub back: Option<NodeId>,
}

impl<T> Node<T> {
    pub fn new(element: T, height: usize) -> Node<T> {
        Node {
            element,
            tower: Tower::new(height),
            back: None,
        }
    }

    #[inline]
    pub fn element(&self) -> &T {
        &self.element
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.tower.height()
    }

    pub fn into_element(self) -> T {
        self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let element = 3;
        let height = 5;
        let node = Node::new(element, height);
        assert_eq!(*node.element(), element);
        assert_eq!(node.height(), height);
        assert!(node.back.is_none());
    }

    #[test]
    fn fresh_tower_points_at_tail() {
        let tower = Tower::new(4);
        for level in 0..tower.height() {
            assert_eq!(tower.next(level), Link::Tail);
            assert_eq!(tower.width(level), 1);
        }
    }

    #[test]
    #[should_panic]
    fn next_out_of_bounds() {
        let tower = Tower::new(2);
        tower.next(10);
    }

    #[test]
    fn link_singleton() {
        let mut tower = Tower::new(5);
        tower.link(2, Link::Node(7), 3);

        for level in 0..tower.height() {
            if level == 2 {
                assert_eq!(tower.next(level), Link::Node(7));
                assert_eq!(tower.width(level), 3);
            } else {
                assert_eq!(tower.next(level), Link::Tail);
                assert_eq!(tower.width(level), 1);
            }
        }
    }

    #[test]
    fn reset_resizes_and_clears() {
        let mut tower = Tower::new(2);
        tower.link(0, Link::Node(1), 1);
        tower.set_width(1, 9);

        tower.reset(4);
        assert_eq!(tower.height(), 4);
        for level in 0..4 {
            assert_eq!(tower.next(level), Link::Tail);
            assert_eq!(tower.width(level), 1);
        }

        tower.reset(1);
        assert_eq!(tower.height(), 1);
    }

    #[test]
    fn link_and_position_conversions() {
        assert_eq!(Link::Node(4).node(), Some(4));
        assert_eq!(Link::Tail.node(), None);
        assert_eq!(Position::from(4), Position::Node(4));
        assert_eq!(Position::Head.node(), None);
    }
}
