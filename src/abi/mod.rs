//! Purpose: C ABI bridge for bindings (libschemite).
//! Exports: C-callable representation/object functions plus handle and
//! string free functions.
//! Role: Stable ABI surface for non-Rust callers.
//! Invariants: Null guards run before any allocation or engine call.
//! Invariants: Out slots are written only when the operation succeeds;
//! failures leave them untouched even when the returned status reads
//! `SCHM_OK` (see [`UNMAPPED_STATUS`]).
//! Invariants: Returned strings come from `malloc` and are released only
//! through `schm_string_free`; handles only through their free function.
//! Notes: Handles are not synchronized; callers serialize cross-thread use.
#![allow(non_camel_case_types)]

mod status;

pub use status::{UNMAPPED_STATUS, schm_status, status_for};

use std::alloc::{Layout, alloc, dealloc};
use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;

use crate::core::object::DataObject;
use crate::core::rep::Representation;

#[repr(C)]
pub struct schm_rep {
    rep: Representation,
}

#[repr(C)]
pub struct schm_object {
    object: DataObject,
}

/// Creates a representation from the schema file at `schema_path`.
///
/// On success writes a caller-owned handle to `out_rep`; release it with
/// [`schm_rep_free`]. Engine failures translate through [`status_for`],
/// so an unreadable file reports `SCHM_INVALID_FILE_PATH`.
#[unsafe(no_mangle)]
pub extern "C" fn schm_rep_new(
    schema_path: *const c_char,
    out_rep: *mut *mut schm_rep,
) -> schm_status {
    if out_rep.is_null() {
        return schm_status::SCHM_INVALID_PARAM;
    }
    let path = match parse_c_str(schema_path) {
        Ok(path) => path,
        Err(code) => return code,
    };
    let rep = match Representation::from_file(path) {
        Ok(rep) => rep,
        Err(err) => return status_for(err.kind()),
    };
    let handle = alloc_handle(schm_rep { rep });
    if handle.is_null() {
        return schm_status::SCHM_NO_MEMORY;
    }
    unsafe {
        *out_rep = handle;
    }
    schm_status::SCHM_OK
}

/// Destroys a representation handle. The handle must not be used again.
#[unsafe(no_mangle)]
pub extern "C" fn schm_rep_free(rep: *mut schm_rep) -> schm_status {
    if rep.is_null() {
        return schm_status::SCHM_INVALID_PARAM;
    }
    unsafe {
        free_handle(rep);
    }
    schm_status::SCHM_OK
}

/// Writes the representation id to `out_id` as a fresh string.
///
/// Any marshal failure reports flat as `SCHM_NO_MEMORY`.
#[unsafe(no_mangle)]
pub extern "C" fn schm_rep_id(rep: *const schm_rep, out_id: *mut *mut c_char) -> schm_status {
    let rep = match borrow_rep(rep) {
        Ok(rep) => rep,
        Err(code) => return code,
    };
    if out_id.is_null() {
        return schm_status::SCHM_INVALID_PARAM;
    }
    let id = match copy_to_c_string(rep.rep.id()) {
        Ok(id) => id,
        Err(code) => return code,
    };
    unsafe {
        *out_id = id;
    }
    schm_status::SCHM_OK
}

/// Builds the configuration skeleton object for the representation.
///
/// The returned handle is caller-owned; release it with
/// [`schm_object_free`]. Any engine failure reports flat as
/// `SCHM_INVALID_SCHEMA`.
#[unsafe(no_mangle)]
pub extern "C" fn schm_rep_config_object(
    rep: *const schm_rep,
    out_object: *mut *mut schm_object,
) -> schm_status {
    let rep = match borrow_rep(rep) {
        Ok(rep) => rep,
        Err(code) => return code,
    };
    if out_object.is_null() {
        return schm_status::SCHM_INVALID_PARAM;
    }
    let config = match rep.rep.config_info() {
        Ok(config) => config,
        Err(_) => return schm_status::SCHM_INVALID_SCHEMA,
    };
    let handle = alloc_handle(schm_object { object: config });
    if handle.is_null() {
        return schm_status::SCHM_NO_MEMORY;
    }
    unsafe {
        *out_object = handle;
    }
    schm_status::SCHM_OK
}

/// Serializes `object` under the representation's schema, writing the
/// document text to `out_doc` as a fresh string.
#[unsafe(no_mangle)]
pub extern "C" fn schm_object_to_doc(
    rep: *const schm_rep,
    object: *const schm_object,
    out_doc: *mut *mut c_char,
) -> schm_status {
    let rep = match borrow_rep(rep) {
        Ok(rep) => rep,
        Err(code) => return code,
    };
    let object = match borrow_object(object) {
        Ok(object) => object,
        Err(code) => return code,
    };
    if out_doc.is_null() {
        return schm_status::SCHM_INVALID_PARAM;
    }
    let doc = match rep.rep.encode(&object.object) {
        Ok(doc) => doc,
        Err(err) => return status_for(err.kind()),
    };
    let text = match copy_to_c_string(&doc) {
        Ok(text) => text,
        Err(code) => return code,
    };
    unsafe {
        *out_doc = text;
    }
    schm_status::SCHM_OK
}

/// Parses document text under the representation's schema, writing a
/// caller-owned object handle to `out_object`.
#[unsafe(no_mangle)]
pub extern "C" fn schm_doc_to_object(
    rep: *const schm_rep,
    doc: *const c_char,
    out_object: *mut *mut schm_object,
) -> schm_status {
    let rep = match borrow_rep(rep) {
        Ok(rep) => rep,
        Err(code) => return code,
    };
    let text = match parse_c_str(doc) {
        Ok(text) => text,
        Err(code) => return code,
    };
    if out_object.is_null() {
        return schm_status::SCHM_INVALID_PARAM;
    }
    let object = match rep.rep.decode(text) {
        Ok(object) => object,
        Err(err) => return status_for(err.kind()),
    };
    let handle = alloc_handle(schm_object { object });
    if handle.is_null() {
        return schm_status::SCHM_NO_MEMORY;
    }
    unsafe {
        *out_object = handle;
    }
    schm_status::SCHM_OK
}

/// Writes the object's identity string to `out_ident` as a fresh string.
///
/// Guards and marshal behavior mirror [`schm_rep_id`].
#[unsafe(no_mangle)]
pub extern "C" fn schm_object_ident(
    object: *const schm_object,
    out_ident: *mut *mut c_char,
) -> schm_status {
    let object = match borrow_object(object) {
        Ok(object) => object,
        Err(code) => return code,
    };
    if out_ident.is_null() {
        return schm_status::SCHM_INVALID_PARAM;
    }
    let ident = match copy_to_c_string(object.object.ident()) {
        Ok(ident) => ident,
        Err(code) => return code,
    };
    unsafe {
        *out_ident = ident;
    }
    schm_status::SCHM_OK
}

/// Destroys an object handle. The handle must not be used again.
#[unsafe(no_mangle)]
pub extern "C" fn schm_object_free(object: *mut schm_object) -> schm_status {
    if object.is_null() {
        return schm_status::SCHM_INVALID_PARAM;
    }
    unsafe {
        free_handle(object);
    }
    schm_status::SCHM_OK
}

/// Releases a string returned by this layer.
#[unsafe(no_mangle)]
pub extern "C" fn schm_string_free(text: *mut c_char) -> schm_status {
    if text.is_null() {
        return schm_status::SCHM_INVALID_PARAM;
    }
    unsafe {
        libc::free(text.cast());
    }
    schm_status::SCHM_OK
}

fn borrow_rep<'a>(rep: *const schm_rep) -> Result<&'a schm_rep, schm_status> {
    if rep.is_null() {
        return Err(schm_status::SCHM_INVALID_PARAM);
    }
    unsafe { Ok(&*rep) }
}

fn borrow_object<'a>(object: *const schm_object) -> Result<&'a schm_object, schm_status> {
    if object.is_null() {
        return Err(schm_status::SCHM_INVALID_PARAM);
    }
    unsafe { Ok(&*object) }
}

fn parse_c_str<'a>(input: *const c_char) -> Result<&'a str, schm_status> {
    if input.is_null() {
        return Err(schm_status::SCHM_INVALID_PARAM);
    }
    unsafe { CStr::from_ptr(input) }
        .to_str()
        .map_err(|_| schm_status::SCHM_INVALID_PARAM)
}

// Handles go through the global allocator directly so exhaustion surfaces
// as a null to check instead of an abort.
fn alloc_handle<T>(value: T) -> *mut T {
    let handle = unsafe { alloc(Layout::new::<T>()) }.cast::<T>();
    if handle.is_null() {
        return ptr::null_mut();
    }
    unsafe {
        ptr::write(handle, value);
    }
    handle
}

unsafe fn free_handle<T>(handle: *mut T) {
    unsafe {
        ptr::drop_in_place(handle);
        dealloc(handle.cast::<u8>(), Layout::new::<T>());
    }
}

// Strings cross the boundary malloc-allocated so the C side has one
// predictable deallocator. NUL-terminated copy; interior NULs cannot be
// represented and report as the marshal failure status.
fn copy_to_c_string(text: &str) -> Result<*mut c_char, schm_status> {
    if text.as_bytes().contains(&0) {
        return Err(schm_status::SCHM_NO_MEMORY);
    }
    let buf = unsafe { libc::malloc(text.len() + 1) }.cast::<u8>();
    if buf.is_null() {
        return Err(schm_status::SCHM_NO_MEMORY);
    }
    unsafe {
        ptr::copy_nonoverlapping(text.as_ptr(), buf, text.len());
        *buf.add(text.len()) = 0;
    }
    Ok(buf.cast::<c_char>())
}
