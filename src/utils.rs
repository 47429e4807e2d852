use std::{cell::{Ref, RefCell, RefMut}, rc::Rc};

/// Shared, interior-mutable handle. Cloning is shallow: both handles see the
/// same value.
#[derive(Debug, Default)]
pub struct RcCell<T> {
	inner: Rc<RefCell<T>>,
}

impl<T> Clone for RcCell<T> {
	fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<T> RcCell<T> {
	pub fn new(value: T) -> Self { Self { inner: Rc::new(RefCell::new(value)) } }

	pub fn borrow(&self) -> Ref<'_, T> { self.inner.borrow() }

	pub fn borrow_mut(&self) -> RefMut<'_, T> { self.inner.borrow_mut() }

	/// Identity comparison, used for reference equality of host objects.
	pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.inner, &other.inner) }

	/// Address of the shared value, for cycle detection.
	pub fn addr(&self) -> usize { Rc::as_ptr(&self.inner) as *const () as usize }
}

impl<T> From<T> for RcCell<T> {
	fn from(value: T) -> Self { Self::new(value) }
}

/// Number of leading whitespace characters, counted in chars, not bytes.
pub fn leading_whitespace(line: &str) -> usize { line.chars().take_while(|c| c.is_whitespace()).count() }
