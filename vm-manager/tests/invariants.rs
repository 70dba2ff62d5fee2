use std::collections::{HashMap, HashSet};

use disk::Disk;
use memory::PhysicalMemory;
use rand::Rng;
use vm_manager::{EvictionPolicyKind, FlushPolicy, VirtualMemoryManager, VmConfig};

const PAGE_SIZE: u32 = 8;
const MEMORY_SIZE: usize = 32;
const STORE_SIZE: usize = 256;

fn check_invariants(vm: &VirtualMemoryManager<PhysicalMemory, Disk>) {
    assert_eq!(vm.bytes_transferred() % PAGE_SIZE as u64, 0);

    let resident = vm.resident_pages();
    let mut frames = HashSet::new();
    for (page, frame) in &resident {
        assert!(frames.insert(*frame), "frame {} mapped twice", frame);
        assert_eq!(vm.frame_of(*page), Some(*frame));
        assert_eq!(
            vm.page_fault_handler().frames().occupant(*frame),
            Some(*page)
        );
    }
    assert!(resident.len() <= vm.translator().num_frames() as usize);
    for page in 0..vm.translator().num_pages() {
        let listed = resident.iter().any(|(p, _)| *p == page);
        assert_eq!(vm.frame_of(page).is_some(), listed);
    }
}

fn random_run(policy: EvictionPolicyKind, flush: FlushPolicy, dirty_tracking: bool) {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = VmConfig::new(PAGE_SIZE)
        .with_eviction_policy(policy)
        .with_flush_policy(flush)
        .with_dirty_tracking(dirty_tracking)
        .with_record_events(false);
    let memory = PhysicalMemory::create(MEMORY_SIZE).unwrap();
    let disk = Disk::in_memory(PAGE_SIZE as usize, STORE_SIZE).unwrap();
    let mut vm = VirtualMemoryManager::new(memory, disk, config).unwrap();

    let mut rng = rand::thread_rng();
    let mut expected: HashMap<u32, u8> = HashMap::new();
    let mut last_faults = 0;
    let mut last_bytes = 0;
    for _ in 0..500 {
        let address = rng.gen_range(0..STORE_SIZE as u32);
        if rng.gen_bool(0.4) {
            let value: u8 = rng.gen();
            vm.write_byte(address, value).unwrap();
            expected.insert(address, value);
        } else {
            let value = vm.read_byte(address).unwrap();
            assert_eq!(value, expected.get(&address).copied().unwrap_or(0));
        }
        if rng.gen_ratio(1, 50) {
            vm.flush_all().unwrap();
        }
        check_invariants(&vm);
        assert!(vm.page_fault_count() >= last_faults);
        assert!(vm.bytes_transferred() >= last_bytes);
        last_faults = vm.page_fault_count();
        last_bytes = vm.bytes_transferred();
    }

    vm.flush_all().unwrap();
    let store = vm.dump_backing_store().unwrap();
    for (address, value) in expected {
        let page = &store.pages[(address / PAGE_SIZE) as usize];
        assert_eq!(page.bytes[(address % PAGE_SIZE) as usize], value);
    }
}

#[test]
fn random_fifo_unconditional() {
    random_run(EvictionPolicyKind::Fifo, FlushPolicy::Unconditional, true);
}

#[test]
fn random_fifo_dirty_only() {
    random_run(EvictionPolicyKind::Fifo, FlushPolicy::DirtyOnly, true);
}

#[test]
fn random_lru_unconditional_without_dirty_tracking() {
    random_run(EvictionPolicyKind::Lru, FlushPolicy::Unconditional, false);
}

#[test]
fn random_lru_dirty_only() {
    random_run(EvictionPolicyKind::Lru, FlushPolicy::DirtyOnly, true);
}

#[test]
fn loads_and_faults_agree() {
    let config = VmConfig::new(PAGE_SIZE)
        .with_eviction_policy(EvictionPolicyKind::Lru)
        .with_flush_policy(FlushPolicy::DirtyOnly);
    let memory = PhysicalMemory::create(MEMORY_SIZE).unwrap();
    let disk = Disk::in_memory(PAGE_SIZE as usize, STORE_SIZE).unwrap();
    let mut vm = VirtualMemoryManager::new(memory, disk, config).unwrap();

    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        vm.read_byte(rng.gen_range(0..STORE_SIZE as u32)).unwrap();
    }
    // reads only: every transferred byte is a load
    assert_eq!(
        vm.bytes_transferred(),
        vm.page_fault_count() * PAGE_SIZE as u64
    );
}
