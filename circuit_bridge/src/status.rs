// circuit_bridge/src/status.rs
//
// Status payload handed across the C boundary.
//
// Ownership runs one way: this library allocates the message of a failure
// payload and the caller gives it back exactly once through
// `circuit_bridge_status_free` (or `Status::from_raw` from Rust).

use std::fmt;
use std::ptr;

/// Two machine words: message address (null on success) and its byte length.
#[repr(C)]
#[derive(Debug)]
pub struct PtrLen {
    pub ptr: *mut u8,
    pub len: usize,
}

impl PtrLen {
    pub const fn null() -> Self {
        PtrLen {
            ptr: ptr::null_mut(),
            len: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.ptr.is_null()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure(String),
}

impl Status {
    pub fn failure(message: impl Into<String>) -> Self {
        Status::Failure(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }

    /// Gives up ownership of the message bytes to the receiver of the payload.
    pub fn into_raw(self) -> PtrLen {
        match self {
            Status::Success => PtrLen::null(),
            Status::Failure(message) => {
                let bytes = message.into_bytes().into_boxed_slice();
                let len = bytes.len();
                // a zero-length box still carries a dangling, non-null address
                let ptr = Box::into_raw(bytes) as *mut u8;
                PtrLen { ptr, len }
            }
        }
    }

    /// Takes back a payload produced by [`Status::into_raw`].
    ///
    /// # Safety
    /// `raw` must come from `into_raw` in this library and must not have been
    /// released already. The allocation is freed when the result is dropped.
    pub unsafe fn from_raw(raw: PtrLen) -> Self {
        if raw.ptr.is_null() {
            return Status::Success;
        }
        let bytes = Box::from_raw(ptr::slice_from_raw_parts_mut(raw.ptr, raw.len));
        match String::from_utf8(bytes.into_vec()) {
            Ok(message) => Status::Failure(message),
            Err(err) => Status::Failure(String::from_utf8_lossy(err.as_bytes()).into_owned()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("success"),
            Status::Failure(message) => write!(f, "failure: {message}"),
        }
    }
}
