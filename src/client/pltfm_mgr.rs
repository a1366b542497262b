//! `pltfm_mgr_rpc` client stub.
//!
//! Covers the calls the platform code makes through this client. Every
//! method that can fail on the daemon side declares
//! `throws (1: InvalidPltfmMgrOperation ouch)`, which decodes to
//! [`ManagerError`].

use thrift::protocol::{
    TFieldIdentifier, TInputProtocol, TMessageIdentifier, TMessageType, TOutputProtocol,
    TStructIdentifier, TType, verify_expected_message_type, verify_expected_sequence_number,
    verify_expected_service_call,
};

use crate::error::{BindingError, Error, ManagerError, Result, TransportError};

use super::connection::ManagerClient;

pub struct PltfmMgrClient {
    input: Box<dyn TInputProtocol>,
    output: Box<dyn TOutputProtocol>,
    seq: i32,
}

impl ManagerClient for PltfmMgrClient {
    const SERVICE: &'static str = "pltfm_mgr_rpc";

    fn bind(
        input: Box<dyn TInputProtocol>,
        output: Box<dyn TOutputProtocol>,
    ) -> core::result::Result<Self, BindingError> {
        Ok(Self {
            input,
            output,
            seq: 0,
        })
    }
}

impl PltfmMgrClient {
    /// Liveness echo; the daemon returns `device` unchanged.
    pub fn pltfm_mgr_dummy(&mut self, device: i8) -> Result<i8> {
        self.call(
            "pltfm_mgr_dummy",
            |o| {
                o.write_field_begin(&TFieldIdentifier::new("device", TType::I08, 1))?;
                o.write_i8(device)?;
                o.write_field_end()
            },
            |i| require(read_manager_result(i, TType::I08, |i| i.read_i8())?),
        )
    }

    pub fn pltfm_mgr_pwr_supply_present_get(&mut self, ps_num: i32) -> Result<bool> {
        self.call(
            "pltfm_mgr_pwr_supply_present_get",
            |o| {
                o.write_field_begin(&TFieldIdentifier::new("ps_num", TType::I32, 1))?;
                o.write_i32(ps_num)?;
                o.write_field_end()
            },
            |i| require(read_manager_result(i, TType::Bool, |i| i.read_bool())?),
        )
    }

    /// Set fan `fan_num` to `percent` of full speed.
    pub fn pltfm_mgr_fan_speed_set(&mut self, fan_num: i32, percent: i32) -> Result<i32> {
        self.call(
            "pltfm_mgr_fan_speed_set",
            |o| {
                o.write_field_begin(&TFieldIdentifier::new("fan_num", TType::I32, 1))?;
                o.write_i32(fan_num)?;
                o.write_field_end()?;
                o.write_field_begin(&TFieldIdentifier::new("percent", TType::I32, 2))?;
                o.write_i32(percent)?;
                o.write_field_end()
            },
            |i| require(read_manager_result(i, TType::I32, |i| i.read_i32())?),
        )
    }

    /// Send `<method>_args` and decode the matching reply.
    fn call<R>(
        &mut self,
        method: &str,
        write_args: impl FnOnce(&mut dyn TOutputProtocol) -> thrift::Result<()>,
        read_result: impl FnOnce(&mut dyn TInputProtocol) -> Result<R>,
    ) -> Result<R> {
        self.seq = self.seq.wrapping_add(1);
        let seq = self.seq;

        let o = self.output.as_mut();
        o.write_message_begin(&TMessageIdentifier::new(method, TMessageType::Call, seq))?;
        o.write_struct_begin(&TStructIdentifier::new(format!("{method}_args")))?;
        write_args(&mut *o)?;
        o.write_field_stop()?;
        o.write_struct_end()?;
        o.write_message_end()?;
        o.flush()?;

        let i = self.input.as_mut();
        let reply = i.read_message_begin()?;
        verify_expected_sequence_number(seq, reply.sequence_number)?;
        verify_expected_service_call(method, &reply.name)?;
        if reply.message_type == TMessageType::Exception {
            let remote = thrift::Error::read_application_error_from_in_protocol(&mut *i)?;
            i.read_message_end()?;
            return Err(thrift::Error::Application(remote).into());
        }
        verify_expected_message_type(TMessageType::Reply, reply.message_type)?;
        let result = read_result(&mut *i)?;
        i.read_message_end()?;
        Ok(result)
    }
}

/// Decode a `<method>_result` struct.
///
/// Field 0 holds the return value (absent for `void`), field 1 the
/// `InvalidPltfmMgrOperation` exception. Unknown fields are skipped.
pub fn read_manager_result<T>(
    i: &mut dyn TInputProtocol,
    success_type: TType,
    read_success: impl FnOnce(&mut dyn TInputProtocol) -> thrift::Result<T>,
) -> Result<Option<T>> {
    let mut read_success = Some(read_success);
    let mut success = None;
    let mut ouch = None;

    i.read_struct_begin()?;
    loop {
        let field = i.read_field_begin()?;
        match (field.field_type, field.id) {
            (TType::Stop, _) => break,
            (ty, Some(0)) if ty == success_type => match read_success.take() {
                Some(read) => success = Some(read(&mut *i)?),
                None => i.skip(ty)?,
            },
            (TType::Struct, Some(1)) => ouch = Some(read_invalid_operation(&mut *i)?),
            (ty, _) => i.skip(ty)?,
        }
        i.read_field_end()?;
    }
    i.read_struct_end()?;

    match ouch {
        Some(e) => Err(e.into()),
        None => Ok(success),
    }
}

/// Decode `struct InvalidPltfmMgrOperation { 1: i32 code }`.
fn read_invalid_operation(i: &mut dyn TInputProtocol) -> thrift::Result<ManagerError> {
    let mut code = 0;
    i.read_struct_begin()?;
    loop {
        let field = i.read_field_begin()?;
        match (field.field_type, field.id) {
            (TType::Stop, _) => break,
            (TType::I32, Some(1)) => code = i.read_i32()?,
            (ty, _) => i.skip(ty)?,
        }
        i.read_field_end()?;
    }
    i.read_struct_end()?;
    Ok(ManagerError::new(code))
}

/// Non-void methods must carry a value when no exception was raised.
fn require<T>(value: Option<T>) -> Result<T> {
    value.ok_or_else(|| {
        Error::Transport(TransportError::Application {
            kind: thrift::ApplicationErrorKind::MissingResult as i32,
            message: "reply carried no result".into(),
        })
    })
}
