//! Selector matching
//!
//! Right-to-left matching of complex selectors, backtracking over
//! descendant and subsequent-sibling combinators.

use crate::selectors::{
    Combinator, ComplexSelector, Compound, PseudoClass, SelectorComponent, SelectorList,
};

/// What an element must expose to be matched against a selector
pub trait SelectorElement: Sized {
    /// Lowercase tag name
    fn local_name(&self) -> &str;
    fn id(&self) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
    /// Attribute value by (lowercase) name
    fn attr(&self, name: &str) -> Option<&str>;
    fn parent_element(&self) -> Option<Self>;
    fn prev_sibling_element(&self) -> Option<Self>;
    fn next_sibling_element(&self) -> Option<Self>;
    /// True if the element has no element children and no non-empty text
    fn is_empty(&self) -> bool;
    /// True if the element is the document element
    fn is_root(&self) -> bool;
}

impl SelectorList {
    /// Check if `element` matches any selector in the list
    pub fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        self.0.iter().any(|complex| complex.matches(element))
    }
}

impl ComplexSelector {
    pub fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(n - 1, element),
        }
    }

    fn matches_at<E: SelectorElement>(&self, index: usize, element: &E) -> bool {
        if !self.compounds[index].matches(element) {
            return false;
        }
        if index == 0 {
            return true;
        }

        let next = index - 1;
        match self.combinators[next] {
            Combinator::Child => element
                .parent_element()
                .is_some_and(|parent| self.matches_at(next, &parent)),
            Combinator::Descendant => {
                let mut ancestor = element.parent_element();
                while let Some(el) = ancestor {
                    if self.matches_at(next, &el) {
                        return true;
                    }
                    ancestor = el.parent_element();
                }
                false
            }
            Combinator::NextSibling => element
                .prev_sibling_element()
                .is_some_and(|sibling| self.matches_at(next, &sibling)),
            Combinator::SubsequentSibling => {
                let mut sibling = element.prev_sibling_element();
                while let Some(el) = sibling {
                    if self.matches_at(next, &el) {
                        return true;
                    }
                    sibling = el.prev_sibling_element();
                }
                false
            }
        }
    }
}

impl Compound {
    /// All simple selectors must match
    pub fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        self.0.iter().all(|c| match_component(c, element))
    }
}

/// Match a single simple selector against an element
pub fn match_component<E: SelectorElement>(component: &SelectorComponent, element: &E) -> bool {
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => element.local_name().eq_ignore_ascii_case(tag),
        SelectorComponent::Id(id) => element.id() == Some(id.as_str()),
        SelectorComponent::Class(class) => element.has_class(class),
        SelectorComponent::Attribute(attr) => attr.matches(element.attr(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(pseudo, element),
    }
}

fn match_pseudo_class<E: SelectorElement>(pseudo: &PseudoClass, element: &E) -> bool {
    match pseudo {
        PseudoClass::Root => element.is_root(),
        PseudoClass::Empty => element.is_empty(),
        PseudoClass::FirstChild => element.prev_sibling_element().is_none(),
        PseudoClass::LastChild => element.next_sibling_element().is_none(),
        PseudoClass::OnlyChild => {
            element.prev_sibling_element().is_none() && element.next_sibling_element().is_none()
        }
        PseudoClass::FirstOfType => position(element, false, true) == 1,
        PseudoClass::LastOfType => position(element, true, true) == 1,
        PseudoClass::OnlyOfType => {
            position(element, false, true) == 1 && position(element, true, true) == 1
        }
        PseudoClass::NthChild(expr) => expr.matches(position(element, false, false)),
        PseudoClass::NthLastChild(expr) => expr.matches(position(element, true, false)),
        PseudoClass::NthOfType(expr) => expr.matches(position(element, false, true)),
        PseudoClass::NthLastOfType(expr) => expr.matches(position(element, true, true)),
        PseudoClass::Not(compounds) => !compounds.iter().any(|c| c.matches(element)),
    }
}

/// 1-based position among element siblings, counted from the end when
/// `from_end`, restricted to the same tag name when `of_type`.
fn position<E: SelectorElement>(element: &E, from_end: bool, of_type: bool) -> i32 {
    let step = |el: &E| {
        if from_end {
            el.next_sibling_element()
        } else {
            el.prev_sibling_element()
        }
    };

    let mut index = 1;
    let mut sibling = step(element);
    while let Some(el) = sibling {
        if !of_type || el.local_name().eq_ignore_ascii_case(element.local_name()) {
            index += 1;
        }
        sibling = step(&el);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_selector;

    type Entry = (&'static str, &'static [&'static str], Option<usize>);

    /// Flat element list: (tag, classes, parent index)
    struct Fixture(Vec<Entry>);

    fn entry(tag: &'static str, classes: &'static [&'static str], parent: Option<usize>) -> Entry {
        (tag, classes, parent)
    }

    #[derive(Clone, Copy)]
    struct El<'a> {
        fixture: &'a Fixture,
        index: usize,
    }

    impl<'a> El<'a> {
        fn siblings(&self) -> Vec<usize> {
            let parent = self.fixture.0[self.index].2;
            (0..self.fixture.0.len())
                .filter(|&i| self.fixture.0[i].2 == parent)
                .collect()
        }

        fn at(&self, index: usize) -> Self {
            El {
                fixture: self.fixture,
                index,
            }
        }
    }

    impl SelectorElement for El<'_> {
        fn local_name(&self) -> &str {
            self.fixture.0[self.index].0
        }
        fn id(&self) -> Option<&str> {
            None
        }
        fn has_class(&self, class: &str) -> bool {
            self.fixture.0[self.index].1.iter().any(|c| *c == class)
        }
        fn attr(&self, _name: &str) -> Option<&str> {
            None
        }
        fn parent_element(&self) -> Option<Self> {
            self.fixture.0[self.index].2.map(|p| self.at(p))
        }
        fn prev_sibling_element(&self) -> Option<Self> {
            let siblings = self.siblings();
            let pos = siblings.iter().position(|&i| i == self.index)?;
            pos.checked_sub(1).map(|p| self.at(siblings[p]))
        }
        fn next_sibling_element(&self) -> Option<Self> {
            let siblings = self.siblings();
            let pos = siblings.iter().position(|&i| i == self.index)?;
            siblings.get(pos + 1).map(|&i| self.at(i))
        }
        fn is_empty(&self) -> bool {
            !self.fixture.0.iter().any(|e| e.2 == Some(self.index))
        }
        fn is_root(&self) -> bool {
            self.fixture.0[self.index].2.is_none()
        }
    }

    fn fixture() -> Fixture {
        // 0 div.root
        //   1 ul
        //     2 li.a  3 li.b  4 li.a
        //   5 p
        Fixture(vec![
            entry("div", &["root"], None),
            entry("ul", &[], Some(0)),
            entry("li", &["a"], Some(1)),
            entry("li", &["b"], Some(1)),
            entry("li", &["a"], Some(1)),
            entry("p", &[], Some(0)),
        ])
    }

    fn check(selector: &str, fixture: &Fixture, index: usize) -> bool {
        parse_selector(selector)
            .unwrap()
            .matches(&El { fixture, index })
    }

    #[test]
    fn test_descendant_and_child() {
        let f = fixture();
        assert!(check("div li", &f, 2));
        assert!(check(".root > ul > li", &f, 3));
        assert!(!check(".root > li", &f, 3));
    }

    #[test]
    fn test_sibling_combinators() {
        let f = fixture();
        assert!(check("li.a + li.b", &f, 3));
        assert!(!check("li.a + li.a", &f, 4));
        assert!(check("li.a ~ li.a", &f, 4));
        assert!(check("ul + p", &f, 5));
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let f = fixture();
        assert!(check("li:first-child", &f, 2));
        assert!(check("li:last-child", &f, 4));
        assert!(check("li:nth-child(2)", &f, 3));
        assert!(check("li:nth-last-child(3)", &f, 2));
        assert!(check("ul:only-of-type", &f, 1));
        assert!(check("p:empty", &f, 5));
        assert!(check(":root", &f, 0));
        assert!(check("li:not(.b)", &f, 4));
        assert!(!check("li:not(.b)", &f, 3));
    }

    #[test]
    fn test_selector_list_any() {
        let f = fixture();
        assert!(check("span, p", &f, 5));
        assert!(!check("span, em", &f, 5));
    }
}
