//! Fixtures shared by the binder integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use braid::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sections)]
pub enum Shelf {
    Fiction,
    Poetry,
    Archive,
}

#[derive(Debug, Clone, PartialEq, Identifiable)]
pub struct Book {
    #[identity]
    pub id: String,
    pub title: String,
}

pub fn book(id: &str) -> Book {
    Book {
        id: id.to_owned(),
        title: format!("Book {id}"),
    }
}

pub fn books(ids: &[&str]) -> Vec<Book> {
    ids.iter().copied().map(book).collect()
}

#[derive(Default)]
pub struct BookCell {
    pub title: String,
}

impl TableCell for BookCell {
    fn prepare_for_reuse(&mut self) {
        self.title.clear();
    }
}

/// A cell whose content is a single string view model.
#[derive(Default)]
pub struct LabelCell {
    pub text: Option<String>,
}

impl TableCell for LabelCell {}

impl ViewModelBindable for LabelCell {
    type ViewModel = String;

    fn set_view_model(&mut self, view_model: String) {
        self.text = Some(view_model);
    }
}

#[derive(Default)]
pub struct BlankCell;

impl TableCell for BlankCell {}

#[derive(Default)]
pub struct BannerView {
    pub text: String,
}

impl HeaderFooterView for BannerView {}

impl ViewModelBindable for BannerView {
    type ViewModel = String;

    fn set_view_model(&mut self, view_model: String) {
        self.text = view_model;
    }
}

#[derive(Default)]
pub struct PlainHeader;

impl HeaderFooterView for PlainHeader {}

/// Shared call log for handlers.
pub type Log<T> = Rc<RefCell<Vec<T>>>;

pub fn log<T>() -> Log<T> {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn ip(section: usize, row: usize) -> IndexPath {
    IndexPath::new(section, row)
}

pub fn model_ids<S: Section>(binder: &TableBinder<S, RecordingTable>, section: usize) -> Vec<String> {
    (0..binder.number_of_rows(section))
        .filter_map(|row| binder.model_at::<Book>(ip(section, row)))
        .map(|book| book.id.clone())
        .collect()
}
