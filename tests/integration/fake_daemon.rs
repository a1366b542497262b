//! Minimal `pltfm_mgr_rpc` daemon on a loopback socket.
//!
//! Speaks Thrift binary with the `thrift` crate's own protocols. Handles:
//!
//! | method                              | reply                               |
//! |-------------------------------------|-------------------------------------|
//! | `pltfm_mgr_dummy(d)`                | `d`                                 |
//! | `pltfm_mgr_pwr_supply_present_get`  | `ps == 1`, or ouch code 7 if ps > 2 |
//! | `pltfm_mgr_fan_speed_set(f, pct)`   | `pct`                               |
//! | anything else                       | application exception 1            |

#![allow(dead_code)]

use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use thrift::protocol::{
    TBinaryInputProtocol, TBinaryOutputProtocol, TFieldIdentifier, TInputProtocol,
    TMessageIdentifier, TMessageType, TOutputProtocol, TStructIdentifier, TType,
};
use thrift::{ApplicationError, ApplicationErrorKind};

/// Code the daemon returns for an out-of-range PSU.
pub const BAD_PSU_CODE: i32 = 7;

pub struct FakeDaemon {
    port: u16,
    calls: Arc<Mutex<Vec<String>>>,
    accepted: Arc<Mutex<usize>>,
}

impl FakeDaemon {
    /// Serve every connection.
    pub fn spawn() -> Self {
        Self::spawn_dropping(0)
    }

    /// Close the first `drop_first` connections without reading.
    pub fn spawn_dropping(drop_first: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let accepted = Arc::new(Mutex::new(0usize));

        let (calls_srv, accepted_srv) = (Arc::clone(&calls), Arc::clone(&accepted));
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let n = {
                    let mut a = accepted_srv.lock().expect("lock");
                    *a += 1;
                    *a
                };
                if n <= drop_first {
                    let _ = stream.shutdown(Shutdown::Both);
                    continue;
                }
                serve(stream, &calls_srv);
            }
        });

        Self {
            port,
            calls,
            accepted,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Message names received so far, as sent on the wire.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn accepted(&self) -> usize {
        *self.accepted.lock().expect("lock")
    }
}

/// Handle calls on one connection until the client hangs up.
fn serve(stream: TcpStream, calls: &Mutex<Vec<String>>) {
    let Ok(read) = stream.try_clone() else { return };
    let mut i = TBinaryInputProtocol::new(read, true);
    let mut o = TBinaryOutputProtocol::new(stream, true);

    while let Ok(msg) = i.read_message_begin() {
        calls.lock().expect("lock").push(msg.name.clone());
        if handle(&mut i, &mut o, &msg).is_err() {
            break;
        }
    }
}

fn handle(
    i: &mut dyn TInputProtocol,
    o: &mut dyn TOutputProtocol,
    msg: &TMessageIdentifier,
) -> thrift::Result<()> {
    let args = read_int_args(i)?;
    i.read_message_end()?;

    let method = msg.name.rsplit(':').next().unwrap_or_default();
    let seq = msg.sequence_number;
    let arg = |n: usize| args.get(n).copied().unwrap_or_default();

    match method {
        "pltfm_mgr_dummy" => reply(o, method, seq, |o| {
            o.write_field_begin(&TFieldIdentifier::new("success", TType::I08, 0))?;
            o.write_i8(arg(0) as i8)?;
            o.write_field_end()
        }),
        "pltfm_mgr_pwr_supply_present_get" => reply(o, method, seq, |o| {
            if arg(0) > 2 {
                o.write_field_begin(&TFieldIdentifier::new("ouch", TType::Struct, 1))?;
                o.write_struct_begin(&TStructIdentifier::new("InvalidPltfmMgrOperation"))?;
                o.write_field_begin(&TFieldIdentifier::new("code", TType::I32, 1))?;
                o.write_i32(BAD_PSU_CODE)?;
                o.write_field_end()?;
                o.write_field_stop()?;
                o.write_struct_end()?;
            } else {
                o.write_field_begin(&TFieldIdentifier::new("success", TType::Bool, 0))?;
                o.write_bool(arg(0) == 1)?;
            }
            o.write_field_end()
        }),
        "pltfm_mgr_fan_speed_set" => reply(o, method, seq, |o| {
            o.write_field_begin(&TFieldIdentifier::new("success", TType::I32, 0))?;
            o.write_i32(arg(1))?;
            o.write_field_end()
        }),
        _ => {
            let e = ApplicationError::new(ApplicationErrorKind::UnknownMethod, "unknown method");
            o.write_message_begin(&TMessageIdentifier::new(method, TMessageType::Exception, seq))?;
            thrift::Error::write_application_error_to_out_protocol(&e, o)?;
            o.write_message_end()?;
            o.flush()
        }
    }
}

/// Read an args struct, keeping integer fields in id order.
fn read_int_args(i: &mut dyn TInputProtocol) -> thrift::Result<Vec<i32>> {
    let mut args = Vec::new();
    i.read_struct_begin()?;
    loop {
        let field = i.read_field_begin()?;
        match field.field_type {
            TType::Stop => break,
            TType::I32 => args.push(i.read_i32()?),
            TType::I08 => args.push(i32::from(i.read_i8()?)),
            ty => i.skip(ty)?,
        }
        i.read_field_end()?;
    }
    i.read_struct_end()?;
    Ok(args)
}

fn reply(
    o: &mut dyn TOutputProtocol,
    method: &str,
    seq: i32,
    body: impl FnOnce(&mut dyn TOutputProtocol) -> thrift::Result<()>,
) -> thrift::Result<()> {
    o.write_message_begin(&TMessageIdentifier::new(method, TMessageType::Reply, seq))?;
    o.write_struct_begin(&TStructIdentifier::new(format!("{method}_result")))?;
    body(&mut *o)?;
    o.write_field_stop()?;
    o.write_struct_end()?;
    o.write_message_end()?;
    o.flush()
}
